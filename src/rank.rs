use crate::scoring::{KeywordSet, Query};
use crate::sections::Section;

/// Capability seam for relevance scoring. Implementations map a query and
/// parallel text lists to parallel score lists; ranking and snippet
/// selection never assume how the numbers are produced.
pub trait RelevanceScorer {
    /// Score whole sections: keyword-boosted, heading-aware.
    fn section_scores(
        &self,
        query: &Query,
        headings: &[String],
        texts: &[String],
        keywords: &KeywordSet,
    ) -> Vec<f64>;

    /// Score snippet candidates: plain textual similarity, no keyword boost.
    fn snippet_scores(&self, query: &Query, candidates: &[String]) -> Vec<f64>;
}

/// Score the whole batch with one delegated call, then sort descending and
/// assign dense 1-based ranks. The sort is stable, so equal scores keep
/// discovery order (per document, then per heading).
pub fn rank_sections(
    scorer: &dyn RelevanceScorer,
    query: &Query,
    keywords: &KeywordSet,
    mut sections: Vec<Section>,
) -> Vec<Section> {
    let headings: Vec<String> = sections.iter().map(|s| s.heading.clone()).collect();
    let texts: Vec<String> = sections.iter().map(|s| s.text.clone()).collect();
    let scores = scorer.section_scores(query, &headings, &texts, keywords);
    debug_assert_eq!(scores.len(), sections.len());

    for (section, score) in sections.iter_mut().zip(scores) {
        section.score = score;
    }

    sections.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    for (i, section) in sections.iter_mut().enumerate() {
        section.importance_rank = i as u32 + 1;
    }
    sections
}

// ── Tests ──
