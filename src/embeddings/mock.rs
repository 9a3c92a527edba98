//! Mock embedding provider for tests
//!
//! Produces deterministic embeddings from text hashes, ensuring:
//! - Same text → same embedding (reproducible tests)
//! - Different texts → different embeddings (similarity tests work)
//! - Empty text → zero vector (the "not embedded" sentinel, like the real
//!   provider)
//! - Configurable dimensions (match the real provider's config)

use super::traits::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic mock embedding provider for tests.
///
/// Generates embeddings by hashing the input text and spreading the hash
/// across the configured number of dimensions. No network calls or external
/// dependencies.
///
/// # Example
///
/// ```rust
/// use impactgraph::embeddings::{EmbeddingProvider, MockEmbeddingProvider};
///
/// # tokio_test::block_on(async {
/// let provider = MockEmbeddingProvider::new(768);
/// let embedding = provider.embed_text("call | call | bar(a)").await.unwrap();
/// assert_eq!(embedding.len(), 768);
///
/// // Same text → same embedding
/// let embedding2 = provider.embed_text("call | call | bar(a)").await.unwrap();
/// assert_eq!(embedding, embedding2);
///
/// // Empty text → zero vector
/// let zero = provider.embed_text("").await.unwrap();
/// assert!(zero.iter().all(|v| *v == 0.0));
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given embedding dimensions.
    ///
    /// Use 768 to match nomic-embed-text (production default).
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate a deterministic embedding from text using hash spreading.
    ///
    /// Algorithm:
    /// 1. Hash the text with `DefaultHasher` (SipHash)
    /// 2. Use the hash as a seed to generate `dimensions` float values
    /// 3. Each dimension is derived by rehashing the previous hash
    /// 4. Values are normalized to [-1.0, 1.0] range
    /// 5. The resulting vector is L2-normalized (unit length)
    fn hash_to_embedding(&self, text: &str) -> Vec<f32> {
        if text.is_empty() {
            return self.zero_vector();
        }

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            // Map u64 to [-1.0, 1.0]
            let value = (hash as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);

            // Chain hash for next dimension
            let mut h = DefaultHasher::new();
            hash.hash(&mut h);
            hash = h.finish();
        }

        // L2-normalize for cosine similarity compatibility
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.hash_to_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.hash_to_embedding(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-hash-embedding"
    }
}
