use std::sync::LazyLock;

use regex::Regex;

use crate::rank::RelevanceScorer;
use crate::scoring::Query;
use crate::sections::Section;

// Split points: sentence-ending punctuation followed by whitespace, any
// line break, or a bullet marker. The punctuation stays with the piece
// before it (handled in split_candidates; regex has no lookbehind).
static SNIP_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+|[\r\n]+|•").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[•●◦\-*]\s*").unwrap());

/// A scored sub-unit of a section's text. The page is inherited from the
/// parent section; no finer-grained attribution is attempted.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub doc: String,
    pub text: String,
    pub page: u32,
}

/// Split section text into trimmed, de-bulleted candidate snippets.
pub fn split_candidates(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for m in SNIP_SPLIT_RE.find_iter(text) {
        // Keep sentence punctuation with the preceding piece.
        let end = if matches!(text.as_bytes()[m.start()], b'.' | b'!' | b'?') {
            m.start() + 1
        } else {
            m.start()
        };
        push_candidate(&mut parts, &text[start..end]);
        start = m.end();
    }
    push_candidate(&mut parts, &text[start..]);
    parts
}

fn push_candidate(parts: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    let piece = BULLET_RE.replace(piece, "");
    if !piece.is_empty() {
        parts.push(piece.into_owned());
    }
}

/// Top `max_snips` candidates from one already-selected section, ordered
/// by descending relevance. The sort is explicitly stable so equal scores
/// keep split order.
pub fn extract_snippets(
    section: &Section,
    query: &Query,
    scorer: &dyn RelevanceScorer,
    max_snips: usize,
) -> Vec<Snippet> {
    if section.text.is_empty() {
        return Vec::new();
    }
    let candidates = split_candidates(&section.text);
    if candidates.is_empty() {
        return Vec::new();
    }

    let scores = scorer.snippet_scores(query, &candidates);
    debug_assert_eq!(scores.len(), candidates.len());

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });

    order
        .into_iter()
        .take(max_snips)
        .map(|i| Snippet {
            doc: section.doc.clone(),
            text: candidates[i].clone(),
            page: section.page,
        })
        .collect()
}

// ── Tests ──
