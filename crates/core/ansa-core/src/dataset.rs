//! Question/answer snapshot loading and validation
//!
//! The dataset is loaded once at startup and never mutated afterwards, so
//! searches can share it behind an `Arc` without locking.

use crate::{AnsaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One question with its accepted answers and a precomputed embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Question text, matched against queries and shown in results
    pub question: String,
    /// Accepted answers in snapshot order
    pub answers: Vec<String>,
    /// Precomputed embedding of the question
    pub embedding: Vec<f32>,
}

/// Immutable collection of snapshot entries
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: Vec<Entry>,
    dimension: usize,
}

impl Dataset {
    /// Build a dataset, validating every entry
    ///
    /// The whole snapshot is rejected when any entry is invalid: a blank
    /// question, an empty answer list, or an embedding whose length differs
    /// from the first entry's.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let dimension = entries.first().map(|e| e.embedding.len()).unwrap_or(0);

        for (idx, entry) in entries.iter().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(AnsaError::validation(format!(
                    "Entry {} has a blank question",
                    idx
                )));
            }
            if entry.answers.is_empty() {
                return Err(AnsaError::validation(format!(
                    "Entry {} has no answers",
                    idx
                )));
            }
            if entry.embedding.len() != dimension {
                return Err(AnsaError::embedding_dimension(
                    format!("entry {} disagrees with the snapshot", idx),
                    entry.embedding.len(),
                    dimension,
                ));
            }
        }

        Ok(Self { entries, dimension })
    }

    /// Parse and validate a JSON snapshot (an array of entries)
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a snapshot from a file on disk
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnsaError::dataset(format!(
                "Failed to read snapshot {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Fetch a snapshot once over HTTP
    pub async fn fetch(url: &str) -> Result<Self> {
        let response = reqwest::get(url).await?;
        if !response.status().is_success() {
            return Err(AnsaError::dataset(format!(
                "Snapshot fetch from {} returned status {}",
                url,
                response.status()
            )));
        }
        let json = response.text().await?;
        Self::from_json(&json)
    }

    /// Dataset with no entries; every search over it comes back empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// All entries in snapshot order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Embedding dimensionality shared by all entries (0 when empty)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
