//! HTTP embedding provider implementation
//!
//! Implements `EmbeddingProvider` against any OpenAI-compatible
//! `/v1/embeddings` endpoint:
//! - **Ollama** (default): `http://localhost:11434/v1/embeddings` with
//!   `nomic-embed-text`
//! - **OpenAI**: `https://api.openai.com/v1/embeddings`
//! - **LiteLLM / vLLM / any OpenAI-compatible**: just set the URL
//!
//! Empty texts never reach the wire: they resolve to the zero vector locally,
//! per the `EmbeddingProvider` contract.

use super::traits::EmbeddingProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP-based embedding provider using the OpenAI `/v1/embeddings` API format.
///
/// Thread-safe and cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

/// OpenAI-compatible embedding request
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: EmbeddingInput,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

/// OpenAI-compatible embedding response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[allow(dead_code)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// OpenAI-compatible error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[allow(dead_code)]
    r#type: Option<String>,
}

impl HttpEmbeddingProvider {
    /// Create a new HTTP embedding provider with explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `url` - The embedding API endpoint (e.g., `http://localhost:11434/v1/embeddings`)
    /// * `model` - The model name to use (e.g., `nomic-embed-text`)
    /// * `api_key` - Optional API key for authenticated endpoints
    /// * `dimensions` - Expected embedding dimensions (must match the model output)
    pub fn new(url: String, model: String, api_key: Option<String>, dimensions: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url,
            model,
            api_key,
            dimensions,
        }
    }

    /// Send an embedding request and parse the response.
    async fn request_embeddings(&self, input: EmbeddingInput) -> Result<Vec<Vec<f32>>> {
        let request_body = EmbeddingRequest {
            model: self.model.clone(),
            input,
        };

        let mut req = self.client.post(&self.url).json(&request_body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Failed to connect to embedding API at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse OpenAI-style error
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(detail) = err.error {
                    anyhow::bail!(
                        "Embedding API error ({}): {}",
                        status.as_u16(),
                        detail.message
                    );
                }
            }
            anyhow::bail!("Embedding API returned {} — {}", status.as_u16(), body);
        }

        let resp: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding API response")?;

        // Sort by index to ensure correct ordering
        let mut data = resp.data;
        data.sort_by_key(|d| d.index);

        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();

        // Validate dimensions
        for (i, emb) in embeddings.iter().enumerate() {
            if emb.len() != self.dimensions {
                anyhow::bail!(
                    "Embedding dimension mismatch at index {}: expected {}, got {} (model: {})",
                    i,
                    self.dimensions,
                    emb.len(),
                    self.model
                );
            }
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Ok(self.zero_vector());
        }

        let embeddings = self
            .request_embeddings(EmbeddingInput::Single(text.to_string()))
            .await?;

        embeddings
            .into_iter()
            .next()
            .context("Embedding API returned empty response")
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Empty entries resolve to the zero vector locally; only the rest
        // are sent upstream, in order-preserving chunks
        let mut results: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|t| t.is_empty().then(|| self.zero_vector()))
            .collect();

        let pending: Vec<usize> = (0..texts.len()).filter(|&i| !texts[i].is_empty()).collect();

        // Some providers have batch size limits; split into chunks of 50
        const BATCH_SIZE: usize = 50;

        for chunk in pending.chunks(BATCH_SIZE) {
            let input: Vec<String> = chunk.iter().map(|&i| texts[i].clone()).collect();
            let embeddings = self.request_embeddings(EmbeddingInput::Batch(input)).await?;

            anyhow::ensure!(
                embeddings.len() == chunk.len(),
                "Embedding API returned {} vectors for {} inputs",
                embeddings.len(),
                chunk.len()
            );

            for (&i, emb) in chunk.iter().zip(embeddings) {
                results[i] = Some(emb);
            }
        }

        Ok(results.into_iter().map(|r| r.unwrap_or_default()).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
