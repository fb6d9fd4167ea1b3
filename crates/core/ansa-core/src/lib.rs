//! Ansa Core
//!
//! This crate provides the snapshot model and ranking pipeline for a hybrid
//! semantic + keyword search service over a small static question/answer
//! dataset. It includes:
//!
//! - Snapshot loading with wholesale validation
//! - Combined cosine similarity + keyword tier scoring
//! - Edit-distance fuzzy fallback for queries nothing matches outright
//! - Threshold filtering, descending ranking, and result truncation
//! - Query highlighting and advisory prompt composition
//!
//! # Example: Keyword-Only Search
//!
//! ```no_run
//! use ansa_core::{Dataset, Result, SearchEngine};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let dataset = Dataset::load_from_path("data/questions.json")?;
//!     let engine = SearchEngine::new(Arc::new(dataset));
//!     // No query embedding available; keyword tiers still rank entries
//!     let results = engine.search("uptime sla", None);
//!     for result in results {
//!         println!("{:.3}  {}", result.score, result.question);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod dataset;
pub mod error;
pub mod fuzzy;
pub mod highlight;
pub mod scoring;
pub mod search;
pub mod templates;
pub mod utils;

// Re-export main types
pub use config::{
    get_env_bool, get_env_float, get_env_int, get_env_or, get_required_env, load_env,
};
pub use dataset::{Dataset, Entry};
pub use error::{AnsaError, Result};
pub use fuzzy::{FuzzyConfig, FuzzyHit, FuzzyMatcher};
pub use highlight::highlight_matches;
pub use scoring::{cosine_similarity, keyword_score};
pub use search::{SearchConfig, SearchEngine, SearchResult};
pub use templates::{compose_advisory_prompt, TemplateEngine, ADVISORY_PROMPT_TEMPLATE};
pub use utils::logger::init_logging;
