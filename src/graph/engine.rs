//! Per-file ingestion engine
//!
//! Executes the ordered upsert steps for one parsed file:
//!
//! 1. Ensure the Repository node
//! 2. Upsert the File node (refreshing its timestamp)
//! 3. Ensure the HAS_FILE edge
//! 4. Bulk-merge all SyntaxNode records by id
//! 5. Ensure the HAS_ROOT edge
//! 6. Bulk-merge CONTAINS edges
//! 7. Merge CALLS edges (only where the callee name matches an existing node)
//! 8. Merge Symbol nodes and DEFINES/USES edges
//!
//! Node-dependent edges (steps 5–8) only run after the node merge (step 4)
//! has been acknowledged by the store. Running the whole sequence twice with
//! identical input leaves the graph unchanged except for timestamps. A store
//! failure aborts the file — node ids are file-scoped, so other files cannot
//! be corrupted and the file is simply retried on the next run.

use super::collector::{self, FileBatch};
use crate::embeddings::EmbeddingProvider;
use crate::neo4j::GraphStore;
use crate::parser::ParsedSource;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Bounded retries for a failing embedding batch before zero-vector fallback
const EMBED_ATTEMPTS: usize = 3;

/// Base delay for embedding retry backoff
const EMBED_BACKOFF: Duration = Duration::from_millis(200);

/// Drives collection, embedding, and the ordered graph upserts for one file.
pub struct IngestEngine {
    store: Arc<dyn GraphStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IngestEngine {
    /// Create a new engine over injected store and embedder handles
    pub fn new(store: Arc<dyn GraphStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Ingest one parsed file into the repository graph.
    ///
    /// Returns the number of syntax nodes merged.
    pub async fn ingest_file(&self, repo: &str, parsed: &ParsedSource) -> Result<usize> {
        let mut batch = collector::collect(repo, parsed);
        self.fill_embeddings(&mut batch).await;

        let node_count = batch.nodes.len();
        tracing::debug!(
            "Collected {} syntax nodes from {} in repo {}",
            node_count,
            parsed.path,
            repo
        );

        self.store.ensure_repository(repo).await?;
        self.store
            .upsert_file(repo, &parsed.path, chrono::Utc::now())
            .await?;
        self.store.link_file_to_repository(repo, &parsed.path).await?;

        self.store.merge_syntax_nodes(&batch.nodes).await?;

        if let Some(root_id) = &batch.root_id {
            self.store
                .link_file_root(repo, &parsed.path, root_id)
                .await?;
        }

        self.store.merge_contains_edges(&batch.contains).await?;
        self.store.merge_call_edges(&batch.calls).await?;
        self.store.merge_defines_edges(&batch.defines).await?;
        self.store.merge_uses_edges(&batch.uses).await?;

        Ok(node_count)
    }

    /// Fill the embedding vector of every node in the batch.
    ///
    /// Unselected nodes get the zero vector directly. Selected nodes are
    /// embedded in one batch call, retried with backoff a bounded number of
    /// times; a persistently failing provider degrades to zero vectors for
    /// this file instead of failing the ingestion.
    async fn fill_embeddings(&self, batch: &mut FileBatch) {
        let texts: Vec<String> = batch
            .embed_inputs
            .iter()
            .map(|input| input.clone().unwrap_or_default())
            .collect();

        let embeddings = self.embed_with_retry(&texts).await;

        for (node, embedding) in batch.nodes.iter_mut().zip(embeddings) {
            node.embedding = embedding;
        }
    }

    async fn embed_with_retry(&self, texts: &[String]) -> Vec<Vec<f32>> {
        for attempt in 1..=EMBED_ATTEMPTS {
            match self.embedder.embed_batch(texts).await {
                Ok(embeddings) if embeddings.len() == texts.len() => return embeddings,
                Ok(embeddings) => {
                    tracing::warn!(
                        "Embedding batch returned {} vectors for {} inputs; substituting zero vectors",
                        embeddings.len(),
                        texts.len()
                    );
                    break;
                }
                Err(e) if attempt < EMBED_ATTEMPTS => {
                    tracing::warn!(
                        "Embedding batch failed (attempt {}/{}): {}",
                        attempt,
                        EMBED_ATTEMPTS,
                        e
                    );
                    tokio::time::sleep(EMBED_BACKOFF * attempt as u32).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Embedding batch failed after {} attempts: {}; substituting zero vectors",
                        EMBED_ATTEMPTS,
                        e
                    );
                    break;
                }
            }
        }

        vec![self.embedder.zero_vector(); texts.len()]
    }
}
