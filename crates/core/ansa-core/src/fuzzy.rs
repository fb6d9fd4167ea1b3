//! Edit-distance fallback matching
//!
//! Engaged only when no entry clears the acceptance threshold under the
//! combined scorer. A query is compared against each question twice: against
//! query-length windows inside a bounded leading region, and against whole
//! tokens. The better of the two normalized distances decides the match.

use crate::dataset::Dataset;
use std::cmp::min;

/// Tuning for the fallback matcher
#[derive(Debug, Clone)]
pub struct FuzzyConfig {
    /// Maximum accepted normalized distance; candidates above it are dropped
    pub threshold: f64,
    /// Length of the leading window region, in characters
    pub distance: usize,
    /// Tokens shorter than this are not compared
    pub min_match_len: usize,
    /// Maximum candidates returned
    pub limit: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            distance: 100,
            min_match_len: 3,
            limit: 10,
        }
    }
}

/// A fallback candidate: entry index plus its normalized distance
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit {
    /// Index into the dataset entries
    pub index: usize,
    /// Normalized distance in [0, 1]; lower is closer
    pub distance: f64,
}

/// Approximate matcher over entry questions
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    config: FuzzyConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with the given tuning
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// Match the query against every question
    ///
    /// Returns up to `limit` hits ordered by ascending distance.
    pub fn search(&self, query: &str, dataset: &Dataset) -> Vec<FuzzyHit> {
        let query = query.to_lowercase();
        let query_chars: Vec<char> = query.chars().collect();

        let mut hits: Vec<FuzzyHit> = dataset
            .entries()
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let distance = self.question_distance(&query_chars, &entry.question);
                (distance <= self.config.threshold).then_some(FuzzyHit { index, distance })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(self.config.limit);
        hits
    }

    /// Best normalized distance between the query and one question
    fn question_distance(&self, query: &[char], question: &str) -> f64 {
        let question = question.to_lowercase();
        let text: Vec<char> = question.chars().collect();
        let mut best = 1.0f64;

        if query.is_empty() {
            return best;
        }

        // Query-length windows inside the leading region
        let region = min(self.config.distance + query.len(), text.len());
        if region >= query.len() {
            for start in 0..=(region - query.len()) {
                let d = normalized_distance(query, &text[start..start + query.len()]);
                if d < best {
                    best = d;
                }
                if best == 0.0 {
                    return best;
                }
            }
        }

        // Whole tokens, anywhere in the question
        for token in question.split_whitespace() {
            let token_chars: Vec<char> = token.chars().collect();
            if token_chars.len() < self.config.min_match_len {
                continue;
            }
            let d = normalized_distance(query, &token_chars);
            if d < best {
                best = d;
            }
        }

        best
    }
}

/// Levenshtein distance normalized by the longer input, clamped to [0, 1]
fn normalized_distance(a: &[char], b: &[char]) -> f64 {
    let longer = a.len().max(b.len());
    if longer == 0 {
        return 0.0;
    }
    (levenshtein(a, b) as f64 / longer as f64).clamp(0.0, 1.0)
}

/// Two-row Levenshtein over char slices
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = min(min(curr[j] + 1, prev[j + 1] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b.len()]
}
