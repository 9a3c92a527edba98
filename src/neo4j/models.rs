//! Graph records produced by the traversal and merged into Neo4j
//!
//! A `SyntaxNode` record always carries every attribute: merging it is an
//! insert-or-update-all, never a partial patch, so a re-ingest of a file
//! atomically refreshes each node it touches.

use serde::{Deserialize, Serialize};

/// A classified syntax-tree node, ready for bulk merge.
///
/// Identity is `id` = `<file_path>:<start_byte>:<end_byte>`; everything else
/// is replaceable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNodeRecord {
    pub id: String,
    /// Grammar-specific node kind (e.g. `function_declaration`)
    pub kind: String,
    /// Language-agnostic role string (e.g. `function`, `call`, `none`)
    pub semantic_type: String,
    /// Extracted name, when the role carries one
    pub name: Option<String>,
    /// Source-text preview, capped at 250 characters
    pub text: String,
    /// Owning file path
    pub file: String,
    /// Owning repository name
    pub repo: String,
    /// Fixed-dimension vector; all-zero when the node was not selected
    pub embedding: Vec<f32>,
}

/// Structural parent/child containment within one file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainsEdge {
    pub parent: String,
    pub child: String,
}

/// Intent to link a call site to whichever node defines the callee name.
///
/// Resolved at merge time against the whole graph: no matching name, no
/// edge, no placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    /// Node id of the call site
    pub caller: String,
    /// Bare callee name to match against `SyntaxNode.name`
    pub callee_name: String,
}

/// Intent to link a node to a repository-global Symbol by bare name.
///
/// Used for both DEFINES (assignment targets) and USES (identifier reads);
/// the Symbol is created on first reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolEdge {
    /// Node id of the defining/using node
    pub node: String,
    /// Bare symbol name (repository-global, unscoped)
    pub symbol: String,
}
