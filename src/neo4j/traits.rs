//! GraphStore trait definition
//!
//! Defines the abstract interface for all graph-store operations the
//! ingestion engine performs, enabling testing with a mock implementation
//! and future backend swaps.
//!
//! Every operation is a merge (create-if-absent, else update-in-place) keyed
//! by a stated identity, so the store's own atomicity — not in-process
//! locking — is what makes concurrent per-file ingestion safe: node ids are
//! file-scoped, and the shared Symbol namespace and CALLS matching rely
//! solely on merge semantics.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstract interface for the syntax knowledge graph.
///
/// The methods mirror the per-file upsert steps the engine runs in order;
/// each is independently idempotent, so a failed file can be fully retried
/// without corrupting other files' data.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the Repository node if it does not exist
    async fn ensure_repository(&self, repo: &str) -> Result<()>;

    /// Create or refresh the File node under a repository.
    ///
    /// Identity is (repo, path); `updated_at` is refreshed on every pass.
    async fn upsert_file(&self, repo: &str, path: &str, updated_at: DateTime<Utc>) -> Result<()>;

    /// Ensure the HAS_FILE edge from Repository to File
    async fn link_file_to_repository(&self, repo: &str, path: &str) -> Result<()>;

    /// Bulk-merge syntax nodes by id, setting all attributes.
    ///
    /// Completion of this call is the acknowledgement the engine requires
    /// before merging any node-dependent edges for the same file.
    async fn merge_syntax_nodes(&self, nodes: &[SyntaxNodeRecord]) -> Result<()>;

    /// Ensure the HAS_ROOT edge from File to the tree's root node
    async fn link_file_root(&self, repo: &str, path: &str, root_id: &str) -> Result<()>;

    /// Bulk-merge CONTAINS edges between already-merged nodes
    async fn merge_contains_edges(&self, edges: &[ContainsEdge]) -> Result<()>;

    /// Merge CALLS edges for call intents whose callee name matches an
    /// existing node.
    ///
    /// An intent with no matching name produces no edge and no placeholder;
    /// re-running the same intents is a no-op. Name matching is global and
    /// unscoped — cross-file false positives are an accepted approximation.
    async fn merge_call_edges(&self, edges: &[CallEdge]) -> Result<()>;

    /// Merge the Symbol node (create-if-absent) and a DEFINES edge per intent
    async fn merge_defines_edges(&self, edges: &[SymbolEdge]) -> Result<()>;

    /// Merge the Symbol node (create-if-absent) and a USES edge per intent
    async fn merge_uses_edges(&self, edges: &[SymbolEdge]) -> Result<()>;
}
