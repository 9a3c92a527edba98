//! Node identity and embedding selection policy
//!
//! A node's identity is a pure function of its file path and byte range, so
//! re-parsing byte-identical content always produces the same ids and merges
//! converge instead of duplicating. The flip side: any edit shifts the ids of
//! every node after the edit point, rewriting that part of the subgraph on
//! the next ingest. Accepted for now; a content-stable identity (structural
//! path + local index) would remove the churn.

use super::kinds;
use super::SemanticRole;
use tree_sitter::Node;

/// Stored node-text preview is capped at this many characters
pub const TEXT_PREVIEW_CHARS: usize = 250;

/// Characters of node text included in the embedding request
const EMBED_SNIPPET_CHARS: usize = 10;

/// Roles whose nodes always receive an embedding
const EMBEDDED_ROLES: &[SemanticRole] = &[
    SemanticRole::Function,
    SemanticRole::ClassOrType,
    SemanticRole::Call,
    SemanticRole::Assignment,
    SemanticRole::VariableDeclaration,
    SemanticRole::IdentifierUse,
];

/// Stable identifier for a node: `<file_path>:<start_byte>:<end_byte>`.
///
/// Returns `None` for zero-width "missing" nodes inserted by error recovery;
/// the caller skips those without affecting sibling traversal.
pub fn node_id(file_path: &str, node: &Node) -> Option<String> {
    if node.is_missing() {
        return None;
    }
    Some(format!(
        "{}:{}:{}",
        file_path,
        node.start_byte(),
        node.end_byte()
    ))
}

/// Whether a node should carry a vector embedding.
///
/// True for the semantic roles that matter to impact analysis, and for the
/// structural anchor kinds even when role classification failed. Everything
/// else — plain control flow, exception handling, imports, literals, and
/// unclassified nodes — is never embedded.
pub fn should_embed(raw_kind: &str, role: SemanticRole) -> bool {
    if EMBEDDED_ROLES.contains(&role) {
        return true;
    }

    kinds::ANCHOR_KINDS.contains(&raw_kind)
}

/// Text sent to the embedding model for a selected node
pub fn embedding_text(raw_kind: &str, role: SemanticRole, text: &str) -> String {
    let snippet: String = text.chars().take(EMBED_SNIPPET_CHARS).collect();
    format!("{} | {} | {}", raw_kind, role, snippet)
}

/// Bounded node-text preview stored on the graph node
pub fn text_preview(text: &str) -> String {
    text.chars().take(TEXT_PREVIEW_CHARS).collect()
}
