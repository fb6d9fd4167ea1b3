//! Remote Inference Integration
//!
//! Talks to the two inference endpoints the search service depends on:
//! - an embedding endpoint that turns a query into a vector
//! - an advisory endpoint that suggests the best match in prose
//!
//! Both calls are best-effort. Callers degrade to keyword-only scoring or
//! an empty advisory surface when a request fails.

#![warn(missing_docs)]
#![warn(clippy::all)]

use ansa_core::{get_env_or, AnsaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Shared HTTP client for connection pooling to the inference endpoints
static HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

/// Get or initialize the shared HTTP client
/// Returns Arc<Client> to avoid cloning and maintain connection pooling
fn get_http_client() -> Arc<Client> {
    HTTP_CLIENT
        .get_or_init(|| {
            Arc::new(
                Client::builder()
                    .pool_max_idle_per_host(50)
                    .pool_idle_timeout(std::time::Duration::from_secs(300))
                    .tcp_keepalive(std::time::Duration::from_secs(60))
                    .timeout(std::time::Duration::from_secs(300))
                    .connect_timeout(std::time::Duration::from_secs(10))
                    .build()
                    .unwrap_or_else(|e| {
                        panic!(
                            "Failed to create HTTP client: {}. This is a configuration error.",
                            e
                        )
                    }),
            )
        })
        .clone()
}

/// Endpoint URLs for the inference service
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Embedding endpoint; accepts `{"input": ...}`
    pub embedding_url: String,
    /// Advisory endpoint; accepts `{"prompt": ...}`
    pub advisory_url: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            embedding_url: "http://127.0.0.1:8888/embed".to_string(),
            advisory_url: "http://127.0.0.1:8888/chat".to_string(),
        }
    }
}

impl InferenceConfig {
    /// Read endpoint URLs from `ANSA_EMBEDDING_URL` / `ANSA_ADVISORY_URL`
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            embedding_url: get_env_or("ANSA_EMBEDDING_URL", &default.embedding_url),
            advisory_url: get_env_or("ANSA_ADVISORY_URL", &default.advisory_url),
        }
    }
}

/// Embedding API request
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: String,
}

/// Embedding API response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

/// Advisory API request
#[derive(Debug, Serialize)]
struct AdvisoryRequest {
    prompt: String,
}

/// Advisory API response
#[derive(Debug, Deserialize)]
struct AdvisoryResponse {
    advice: Option<String>,
}

/// Seam over the remote inference endpoints
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Embed a search query
    async fn embed(&self, input: &str) -> Result<Vec<f32>>;

    /// Generate advisory text for a composed prompt
    async fn advise(&self, prompt: &str) -> Result<String>;
}

/// HTTP client for the inference endpoints
pub struct HttpInferenceClient {
    client: Arc<Client>,
    config: InferenceConfig,
}

impl HttpInferenceClient {
    /// Create a new client with the shared connection pool
    ///
    /// # Errors
    /// Returns an error if either endpoint URL is invalid
    pub fn new(config: InferenceConfig) -> Result<Self> {
        Self::validate_url(&config.embedding_url)?;
        Self::validate_url(&config.advisory_url)?;

        Ok(Self {
            client: get_http_client(),
            config,
        })
    }

    /// Validate URL format
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(AnsaError::config("Endpoint URL cannot be empty"));
        }

        if url.len() > 2048 {
            return Err(AnsaError::config("URL is too long (max 2048 characters)"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AnsaError::config(format!(
                "Invalid URL format: '{}'. Must start with http:// or https://",
                url
            )));
        }

        Ok(())
    }

    fn validate_text(text: &str, what: &str) -> Result<()> {
        if text.is_empty() {
            return Err(AnsaError::validation(format!("{} cannot be empty", what)));
        }

        if text.len() > 100_000 {
            return Err(AnsaError::validation(format!(
                "{} is too long (max 100KB)",
                what
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceClient {
    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        Self::validate_text(input, "Embedding input")?;

        let request = EmbeddingRequest {
            input: input.to_string(),
        };
        let resp = self
            .client
            .post(&self.config.embedding_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AnsaError::inference(format!(
                    "Embedding request failed: {}. Check if the inference service is running at {}",
                    e, self.config.embedding_url
                ))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(AnsaError::inference(format!(
                "Embedding endpoint returned error status {}: {}",
                status, error_text
            )));
        }

        let payload: EmbeddingResponse = resp.json().await?;
        let embedding = payload
            .embedding
            .ok_or_else(|| AnsaError::inference("Embedding endpoint returned no embedding"))?;
        debug!("Embedded query into {} dimensions", embedding.len());
        Ok(embedding)
    }

    async fn advise(&self, prompt: &str) -> Result<String> {
        Self::validate_text(prompt, "Advisory prompt")?;

        let request = AdvisoryRequest {
            prompt: prompt.to_string(),
        };
        let resp = self
            .client
            .post(&self.config.advisory_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AnsaError::inference(format!(
                    "Advisory request failed: {}. Check if the inference service is running at {}",
                    e, self.config.advisory_url
                ))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(AnsaError::inference(format!(
                "Advisory endpoint returned error status {}: {}",
                status, error_text
            )));
        }

        let payload: AdvisoryResponse = resp.json().await?;
        payload
            .advice
            .ok_or_else(|| AnsaError::inference("Advisory endpoint returned no advice"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn_fixture(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> HttpInferenceClient {
        HttpInferenceClient::new(InferenceConfig {
            embedding_url: format!("{}/embed", base),
            advisory_url: format!("{}/chat", base),
        })
        .unwrap()
    }

    // ===== Validation Tests =====

    #[test]
    fn test_validate_url() {
        assert!(HttpInferenceClient::validate_url("http://127.0.0.1:8888/embed").is_ok());
        assert!(HttpInferenceClient::validate_url("https://inference.internal/chat").is_ok());
        assert!(HttpInferenceClient::validate_url("").is_err());
        assert!(HttpInferenceClient::validate_url("ftp://example.com").is_err());
        assert!(HttpInferenceClient::validate_url(&format!(
            "http://{}",
            "a".repeat(2048)
        ))
        .is_err());
    }

    #[test]
    fn test_client_construction() {
        assert!(HttpInferenceClient::new(InferenceConfig::default()).is_ok());

        let bad = InferenceConfig {
            embedding_url: "not-a-url".to_string(),
            ..InferenceConfig::default()
        };
        assert!(HttpInferenceClient::new(bad).is_err());
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_request() {
        let client = HttpInferenceClient::new(InferenceConfig::default()).unwrap();
        assert!(matches!(
            client.embed("").await,
            Err(AnsaError::Validation(_))
        ));
        assert!(matches!(
            client.advise("").await,
            Err(AnsaError::Validation(_))
        ));
    }

    // ===== Wire Shape Tests =====

    #[test]
    fn test_request_wire_shapes() {
        let embed = serde_json::to_value(EmbeddingRequest {
            input: "uptime sla".to_string(),
        })
        .unwrap();
        assert_eq!(embed, serde_json::json!({"input": "uptime sla"}));

        let advise = serde_json::to_value(AdvisoryRequest {
            prompt: "pick one".to_string(),
        })
        .unwrap();
        assert_eq!(advise, serde_json::json!({"prompt": "pick one"}));
    }

    // ===== Endpoint Round-Trip Tests =====

    #[tokio::test]
    async fn test_embed_round_trip() {
        let app = Router::new().route(
            "/embed",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["input"], "what is the uptime sla");
                Json(serde_json::json!({"embedding": [0.25, -0.5, 1.0]}))
            }),
        );
        let base = spawn_fixture(app).await;

        let embedding = client_for(&base)
            .embed("what is the uptime sla")
            .await
            .unwrap();
        assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_advise_round_trip() {
        let app = Router::new().route(
            "/chat",
            post(|| async { Json(serde_json::json!({"advice": "The first match fits best."})) }),
        );
        let base = spawn_fixture(app).await;

        let advice = client_for(&base).advise("User asked: ...").await.unwrap();
        assert_eq!(advice, "The first match fits best.");
    }

    #[tokio::test]
    async fn test_missing_embedding_field_is_an_error() {
        let app = Router::new().route(
            "/embed",
            post(|| async { Json(serde_json::json!({"model": "text-embedding"})) }),
        );
        let base = spawn_fixture(app).await;

        let result = client_for(&base).embed("query").await;
        assert!(matches!(result, Err(AnsaError::Inference(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new(); // nothing mounted: every request 404s
        let base = spawn_fixture(app).await;

        let result = client_for(&base).advise("prompt").await;
        match result {
            Err(AnsaError::Inference(msg)) => assert!(msg.contains("404")),
            other => panic!("expected inference error, got {:?}", other),
        }
    }
}
