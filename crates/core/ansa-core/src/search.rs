//! Hybrid search engine over a snapshot
//!
//! Scores every entry with cosine similarity plus the keyword tier, keeps
//! those above the acceptance threshold, and falls back to edit-distance
//! matching only when nothing qualifies.

use crate::dataset::{Dataset, Entry};
use crate::fuzzy::{FuzzyConfig, FuzzyMatcher};
use crate::scoring::{cosine_similarity, keyword_score};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ranking parameters
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum combined score an entry must reach
    pub score_threshold: f64,
    /// Maximum number of results returned
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.25,
            max_results: 10,
        }
    }
}

/// One ranked match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matched question text
    pub question: String,
    /// Accepted answers for the question
    pub answers: Vec<String>,
    /// Combined relevance score
    pub score: f64,
}

/// Ranks snapshot entries for a query
///
/// Holds the dataset behind an `Arc` and never mutates it, so one engine
/// can serve concurrent searches without locking.
#[derive(Clone)]
pub struct SearchEngine {
    dataset: Arc<Dataset>,
    config: SearchConfig,
    fuzzy: FuzzyMatcher,
}

impl SearchEngine {
    /// Engine with default ranking and fallback tuning
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_config(dataset, SearchConfig::default(), FuzzyConfig::default())
    }

    /// Engine with explicit tuning
    pub fn with_config(dataset: Arc<Dataset>, config: SearchConfig, fuzzy: FuzzyConfig) -> Self {
        Self {
            dataset,
            config,
            fuzzy: FuzzyMatcher::new(fuzzy),
        }
    }

    /// Rank entries for a query
    ///
    /// A query embedding whose length differs from the snapshot dimension is
    /// discarded and scoring proceeds on keywords alone. When no entry
    /// reaches the threshold the fuzzy fallback supplies the result set.
    /// Returns at most `max_results` results, best first; ties keep
    /// snapshot order.
    pub fn search(&self, query: &str, query_embedding: Option<&[f32]>) -> Vec<SearchResult> {
        let query_embedding = query_embedding.filter(|embedding| {
            if embedding.len() == self.dataset.dimension() {
                true
            } else {
                warn!(
                    "Discarding query embedding: length {} does not match snapshot dimension {}",
                    embedding.len(),
                    self.dataset.dimension()
                );
                false
            }
        });

        let mut results: Vec<SearchResult> = self
            .dataset
            .entries()
            .iter()
            .map(|entry| self.score_entry(query, query_embedding, entry))
            .filter(|result| result.score >= self.config.score_threshold)
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if results.is_empty() {
            debug!(
                "No entry reached {}; engaging fuzzy fallback",
                self.config.score_threshold
            );
            results = self.fallback(query);
        }

        results.truncate(self.config.max_results);
        results
    }

    fn score_entry(
        &self,
        query: &str,
        query_embedding: Option<&[f32]>,
        entry: &Entry,
    ) -> SearchResult {
        let similarity = query_embedding
            .map(|embedding| cosine_similarity(embedding, &entry.embedding))
            .unwrap_or(0.0);
        let keyword = keyword_score(query, &entry.question);

        SearchResult {
            question: entry.question.clone(),
            answers: entry.answers.clone(),
            score: similarity + keyword,
        }
    }

    /// Fallback candidates remapped so each clears the acceptance threshold
    fn fallback(&self, query: &str) -> Vec<SearchResult> {
        self.fuzzy
            .search(query, &self.dataset)
            .into_iter()
            .map(|hit| {
                let entry = &self.dataset.entries()[hit.index];
                SearchResult {
                    question: entry.question.clone(),
                    answers: entry.answers.clone(),
                    score: (1.0 - hit.distance).max(self.config.score_threshold),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, embedding: Vec<f32>) -> Entry {
        Entry {
            question: question.to_string(),
            answers: vec![format!("Answer to: {}", question)],
            embedding,
        }
    }

    fn engine(entries: Vec<Entry>) -> SearchEngine {
        SearchEngine::new(Arc::new(Dataset::from_entries(entries).unwrap()))
    }

    // ===== Primary Ranking Tests =====

    #[test]
    fn test_keyword_only_ranking() {
        let engine = engine(vec![
            entry("What is your uptime SLA?", vec![1.0, 0.0]),
            entry("How is pricing structured?", vec![0.0, 1.0]),
        ]);

        let results = engine.search("sla", None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "What is your uptime SLA?");
        assert_eq!(results[0].score, 0.30);
    }

    #[test]
    fn test_cosine_and_keyword_scores_add() {
        let engine = engine(vec![entry("API Integration guide", vec![1.0, 0.0])]);

        let results = engine.search("api", Some(&[1.0, 0.0]));
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.30).abs() < 1e-6);
    }

    #[test]
    fn test_results_sorted_descending() {
        let engine = engine(vec![
            entry("Data residency options", vec![0.0, 1.0]),
            entry("Data retention policy", vec![1.0, 0.0]),
        ]);

        // Both get the containment bonus; the embedding breaks the tie.
        let results = engine.search("data", Some(&[1.0, 0.0]));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].question, "Data retention policy");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_equal_scores_keep_snapshot_order() {
        let engine = engine(vec![
            entry("Backup cadence", vec![0.5]),
            entry("Backup encryption", vec![0.5]),
        ]);

        let results = engine.search("backup", None);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].question, "Backup cadence");
        assert_eq!(results[1].question, "Backup encryption");
    }

    #[test]
    fn test_truncates_to_max_results() {
        let entries = (0..25)
            .map(|i| entry(&format!("Support plan {}", i), vec![0.1]))
            .collect();
        let engine = engine(entries);

        assert_eq!(engine.search("support", None).len(), 10);
    }

    #[test]
    fn test_below_threshold_entries_dropped() {
        let engine = engine(vec![
            entry("What is your uptime SLA?", vec![1.0, 0.0]),
            entry("How is pricing structured?", vec![0.0, 1.0]),
        ]);

        // Orthogonal embedding and no keyword overlap for the second entry.
        let results = engine.search("uptime", Some(&[1.0, 0.0]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "What is your uptime SLA?");
    }

    #[test]
    fn test_mismatched_query_embedding_is_discarded() {
        let engine = engine(vec![entry("What is your uptime SLA?", vec![1.0, 0.0])]);

        // Three dimensions against a two-dimensional snapshot.
        let results = engine.search("sla", Some(&[1.0, 0.0, 0.0]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.30);
    }

    #[test]
    fn test_empty_dataset_returns_nothing() {
        let engine = SearchEngine::new(Arc::new(Dataset::empty()));
        assert!(engine.search("anything at all", Some(&[1.0])).is_empty());
    }

    // ===== Fallback Tests =====

    #[test]
    fn test_fallback_engages_when_nothing_qualifies() {
        let engine = engine(vec![
            entry("What is your uptime SLA?", vec![1.0, 0.0]),
            entry("How is pricing structured?", vec![0.0, 1.0]),
        ]);

        let results = engine.search("uptmie", None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "What is your uptime SLA?");
        assert!(results[0].score >= 0.25);
        assert!(results[0].score < 1.0);
    }

    #[test]
    fn test_fallback_not_used_when_primary_matches() {
        let engine = engine(vec![
            entry("What is your uptime SLA?", vec![1.0, 0.0]),
            entry("Maintenance window uptimes", vec![0.0, 1.0]),
        ]);

        // "uptime" is contained in both questions; fallback must stay out.
        let results = engine.search("uptime", None);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, 0.30);
        assert_eq!(results[1].score, 0.30);
    }

    #[test]
    fn test_fallback_scores_floored_at_threshold() {
        let dataset = Arc::new(
            Dataset::from_entries(vec![entry("What is your uptime SLA?", vec![1.0])]).unwrap(),
        );
        let engine = SearchEngine::with_config(
            dataset,
            SearchConfig::default(),
            FuzzyConfig {
                threshold: 0.95,
                ..FuzzyConfig::default()
            },
        );

        // A distant match remaps below 0.25 and gets clamped up to it.
        let results = engine.search("uberx", None);
        assert!(!results.is_empty());
        for result in &results {
            assert!(result.score >= 0.25);
        }
    }

    #[test]
    fn test_fallback_returns_empty_for_hopeless_query() {
        let engine = engine(vec![entry("What is your uptime SLA?", vec![1.0])]);
        assert!(engine.search("zzzzzz", None).is_empty());
    }
}
