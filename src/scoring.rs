use std::collections::{HashMap, HashSet};

use crate::rank::RelevanceScorer;

/// Tokenized persona+job text, built once per run and reused for every
/// section and snippet in the batch.
#[derive(Debug, Clone)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Distinctive query terms used to boost section scores. Snippet scoring
/// never sees these.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: HashSet<String>,
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "into",
    "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "will",
    "with", "you", "your",
];

/// Lowercase alphanumeric runs, length >= 2, stopwords removed.
/// Duplicates are kept so term frequency survives.
fn tokenize(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            cur.extend(ch.to_lowercase());
        } else if !cur.is_empty() {
            push_token(&mut out, std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        push_token(&mut out, cur);
    }
    out
}

fn push_token(out: &mut Vec<String>, tok: String) {
    if tok.len() >= 2 && !STOPWORDS.contains(&tok.as_str()) {
        out.push(tok);
    }
}

pub fn build_query(persona: &str, job: &str) -> Query {
    let mut terms = tokenize(persona);
    terms.extend(tokenize(job));
    // Unique, first-appearance order.
    let mut seen = HashSet::new();
    terms.retain(|t| seen.insert(t.clone()));
    Query { terms }
}

pub fn build_keywords(persona: &str, job: &str) -> KeywordSet {
    let query = build_query(persona, job);
    let terms = query
        .terms
        .into_iter()
        .filter(|t| t.len() >= 4)
        .collect();
    KeywordSet { terms }
}

/// Deterministic lexical scorer: IDF-weighted query-term overlap, with
/// heading and keyword boosts for sections. Scores are unbounded floats;
/// only their relative order matters to callers.
pub struct LexicalScorer;

const HEADING_WEIGHT: f64 = 2.0;
const KEYWORD_WEIGHT: f64 = 0.5;

impl RelevanceScorer for LexicalScorer {
    fn section_scores(
        &self,
        query: &Query,
        headings: &[String],
        texts: &[String],
        keywords: &KeywordSet,
    ) -> Vec<f64> {
        debug_assert_eq!(headings.len(), texts.len());
        if query.is_empty() {
            return vec![0.0; texts.len()];
        }

        let token_sets: Vec<HashSet<String>> = texts
            .iter()
            .map(|t| tokenize(t).into_iter().collect())
            .collect();
        let idf = inverse_document_frequency(&token_sets);

        headings
            .iter()
            .zip(&token_sets)
            .map(|(heading, tokens)| {
                let body = weighted_overlap(&query.terms, tokens, &idf);
                let heading_tokens: HashSet<String> = tokenize(heading).into_iter().collect();
                let head = plain_overlap(&query.terms, &heading_tokens);
                let hits = keywords
                    .terms
                    .iter()
                    .filter(|k| tokens.contains(*k) || heading_tokens.contains(*k))
                    .count();
                let kw = if keywords.terms.is_empty() {
                    0.0
                } else {
                    hits as f64 / keywords.terms.len() as f64
                };
                body + HEADING_WEIGHT * head + KEYWORD_WEIGHT * kw
            })
            .collect()
    }

    fn snippet_scores(&self, query: &Query, candidates: &[String]) -> Vec<f64> {
        if query.is_empty() {
            return vec![0.0; candidates.len()];
        }
        let token_sets: Vec<HashSet<String>> = candidates
            .iter()
            .map(|t| tokenize(t).into_iter().collect())
            .collect();
        let idf = inverse_document_frequency(&token_sets);
        token_sets
            .iter()
            .map(|tokens| weighted_overlap(&query.terms, tokens, &idf))
            .collect()
    }
}

/// idf(t) = ln((n + 1) / (df + 1)) + 1, over the batch at hand.
fn inverse_document_frequency(token_sets: &[HashSet<String>]) -> HashMap<String, f64> {
    let n = token_sets.len() as f64;
    let mut df: HashMap<&str, usize> = HashMap::new();
    for tokens in token_sets {
        for t in tokens {
            *df.entry(t.as_str()).or_default() += 1;
        }
    }
    df.into_iter()
        .map(|(t, count)| (t.to_string(), ((n + 1.0) / (count as f64 + 1.0)).ln() + 1.0))
        .collect()
}

/// Share of the query covered by `tokens`, weighting rare terms higher.
fn weighted_overlap(
    query_terms: &[String],
    tokens: &HashSet<String>,
    idf: &HashMap<String, f64>,
) -> f64 {
    let total: f64 = query_terms
        .iter()
        .map(|t| idf.get(t).copied().unwrap_or(1.0))
        .sum();
    if total == 0.0 {
        return 0.0;
    }
    let matched: f64 = query_terms
        .iter()
        .filter(|t| tokens.contains(*t))
        .map(|t| idf.get(t).copied().unwrap_or(1.0))
        .sum();
    matched / total
}

fn plain_overlap(query_terms: &[String], tokens: &HashSet<String>) -> f64 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let matched = query_terms.iter().filter(|t| tokens.contains(*t)).count();
    matched as f64 / query_terms.len() as f64
}

// ── Tests ──
