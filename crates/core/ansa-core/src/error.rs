//! Error types for Ansa core

use thiserror::Error;

/// Main error type for Ansa operations
#[derive(Debug, Error)]
pub enum AnsaError {
    /// Snapshot loading error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Snapshot validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Inference endpoint error (embedding or advisory)
    #[error("Inference error: {0}")]
    Inference(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),

    /// Embedding length disagrees with the snapshot dimension
    #[error("Embedding dimension error: {message}. Dimension: {dimension}, Expected: {expected}")]
    EmbeddingDimension {
        /// Error message
        message: String,
        /// Actual embedding dimension
        dimension: usize,
        /// Expected embedding dimension
        expected: usize,
    },
}

/// Convenient Result type using AnsaError
pub type Result<T> = std::result::Result<T, AnsaError>;

impl AnsaError {
    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        AnsaError::Dataset(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AnsaError::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        AnsaError::Config(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        AnsaError::Inference(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        AnsaError::Template(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        AnsaError::Other(msg.into())
    }

    /// Create an embedding dimension error
    pub fn embedding_dimension(
        message: impl Into<String>,
        dimension: usize,
        expected: usize,
    ) -> Self {
        AnsaError::EmbeddingDimension {
            message: message.into(),
            dimension,
            expected,
        }
    }
}
