//! Syntax-tree traversal and batch collection
//!
//! One depth-first pass over the tree produces everything the upsert steps
//! need: the full node record batch and the typed edge-intent batches. The
//! traversal uses an explicit LIFO worklist carrying the parent id alongside
//! each queued node, so deeply nested trees cannot overflow the call stack.

use crate::neo4j::models::{CallEdge, ContainsEdge, SymbolEdge, SyntaxNodeRecord};
use crate::parser::ParsedSource;
use crate::semantics::{classify, identity, node_text, SemanticRecord};

/// Everything collected from one file's syntax tree, ready for upsert.
///
/// `embed_inputs` is aligned index-for-index with `nodes`: `Some(text)` for
/// nodes selected by the embedding policy, `None` for the rest.
#[derive(Debug, Default)]
pub struct FileBatch {
    /// Id of the tree's root node (absent only for a missing root)
    pub root_id: Option<String>,
    pub nodes: Vec<SyntaxNodeRecord>,
    /// Embedding request text per node, aligned with `nodes`
    pub embed_inputs: Vec<Option<String>>,
    pub contains: Vec<ContainsEdge>,
    pub calls: Vec<CallEdge>,
    pub defines: Vec<SymbolEdge>,
    pub uses: Vec<SymbolEdge>,
}

/// Walk the parsed file once and collect node records plus edge intents.
///
/// Every descendant is visited exactly once. A node without an identity
/// (a zero-width "missing" node from error recovery) is skipped together
/// with its subtree, without affecting sibling traversal.
pub fn collect(repo: &str, parsed: &ParsedSource) -> FileBatch {
    let source = parsed.content.as_slice();
    let root = parsed.tree.root_node();

    let mut batch = FileBatch {
        root_id: identity::node_id(&parsed.path, &root),
        ..Default::default()
    };

    let mut stack: Vec<(tree_sitter::Node, Option<String>)> = vec![(root, None)];

    while let Some((node, parent_id)) = stack.pop() {
        let Some(nid) = identity::node_id(&parsed.path, &node) else {
            continue;
        };

        let text = node_text(&node, source);
        let record = classify(&node, source);
        let role = record.role();
        let kind = node.kind();

        let embed_input = identity::should_embed(kind, role)
            .then(|| identity::embedding_text(kind, role, &text));

        batch.nodes.push(SyntaxNodeRecord {
            id: nid.clone(),
            kind: kind.to_string(),
            semantic_type: role.as_str().to_string(),
            name: record.name().map(|s| s.to_string()),
            text: identity::text_preview(&text),
            file: parsed.path.clone(),
            repo: repo.to_string(),
            embedding: Vec::new(),
        });
        batch.embed_inputs.push(embed_input);

        if let Some(parent) = parent_id {
            batch.contains.push(ContainsEdge {
                parent,
                child: nid.clone(),
            });
        }

        match &record {
            SemanticRecord::Call {
                function_name: Some(callee),
                ..
            } => {
                batch.calls.push(CallEdge {
                    caller: nid.clone(),
                    callee_name: callee.clone(),
                });
            }
            SemanticRecord::Assignment {
                target_name: Some(target),
            } => {
                batch.defines.push(SymbolEdge {
                    node: nid.clone(),
                    symbol: target.clone(),
                });
            }
            SemanticRecord::IdentifierUse { name } if !name.is_empty() => {
                batch.uses.push(SymbolEdge {
                    node: nid.clone(),
                    symbol: name.clone(),
                });
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push((child, Some(nid.clone())));
        }
    }

    batch
}
