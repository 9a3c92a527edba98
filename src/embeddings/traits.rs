//! EmbeddingProvider trait definition
//!
//! Defines the abstract interface for vector embedding generation.
//! Async trait + Send + Sync for `Arc<dyn EmbeddingProvider>` usage, the same
//! shape as `GraphStore`.

use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for generating vector embeddings from text.
///
/// Implementations must be thread-safe (`Send + Sync`) to be shared across
/// async ingestion workers via `Arc<dyn EmbeddingProvider>`.
///
/// # Zero-vector contract
///
/// Empty input text yields the all-zero vector of [`dimensions()`] length,
/// deterministically and without contacting any upstream service. The zero
/// vector marks a node that was not selected for embedding; it is not a
/// valid similarity match and retrieval must never treat it as one.
///
/// # Implementations
///
/// - [`HttpEmbeddingProvider`](super::HttpEmbeddingProvider): HTTP client for
///   any OpenAI-compatible `/v1/embeddings` endpoint (Ollama, OpenAI, …)
/// - [`MockEmbeddingProvider`](super::MockEmbeddingProvider): deterministic
///   mock that derives embeddings from text hashes (for tests)
///
/// [`dimensions()`]: Self::dimensions
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a vector embedding for a single text input.
    ///
    /// Returns a vector of `f32` with length equal to
    /// [`dimensions()`](Self::dimensions).
    ///
    /// # Errors
    ///
    /// Returns an error if embedding generation fails (network error, API
    /// error, model not loaded, etc.). Empty text never fails.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate vector embeddings for multiple texts in a single batch.
    ///
    /// Returns one embedding per input text, in the same order. Empty entries
    /// map to the zero vector without being sent upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if any non-empty embedding in the batch fails.
    /// Implementations should aim for all-or-nothing semantics.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// The dimensionality of the vectors produced by this provider.
    ///
    /// Fixed for a given model and must match the Neo4j vector index
    /// configuration (e.g. 768 for nomic-embed-text). An implementation must
    /// never change this across calls.
    fn dimensions(&self) -> usize;

    /// The name of the embedding model being used.
    fn model_name(&self) -> &str;

    /// The all-zero sentinel vector for unselected nodes
    fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimensions()]
    }
}
