//! Language-agnostic semantic classification of syntax nodes
//!
//! `classify` maps a raw tree-sitter node onto a [`SemanticRecord`], a tagged
//! union with one variant per semantic role, each carrying only the fields
//! valid for that role. Dispatch is driven entirely by the kind tables in
//! [`kinds`]; no type or scope resolution is attempted — names are extracted
//! by shape, which is a documented heuristic, not a compiler-grade resolver.

pub mod identity;
pub mod kinds;

use tree_sitter::Node;

/// The language-agnostic role of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticRole {
    Function,
    ClassOrType,
    VariableDeclaration,
    Assignment,
    Call,
    IdentifierUse,
    ReturnStatement,
    ControlFlowStatement,
    ExceptionHandling,
    ImportStatement,
    Literal,
    None,
}

impl SemanticRole {
    /// Snake-case string stored on graph nodes and used by the full-text index
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::ClassOrType => "class_or_type",
            Self::VariableDeclaration => "variable_declaration",
            Self::Assignment => "assignment",
            Self::Call => "call",
            Self::IdentifierUse => "identifier_use",
            Self::ReturnStatement => "return_statement",
            Self::ControlFlowStatement => "control_flow_statement",
            Self::ExceptionHandling => "exception_handling",
            Self::ImportStatement => "import_statement",
            Self::Literal => "literal",
            Self::None => "none",
        }
    }

    /// Every role, for exhaustive policy tests
    pub fn all() -> &'static [Self] {
        &[
            Self::Function,
            Self::ClassOrType,
            Self::VariableDeclaration,
            Self::Assignment,
            Self::Call,
            Self::IdentifierUse,
            Self::ReturnStatement,
            Self::ControlFlowStatement,
            Self::ExceptionHandling,
            Self::ImportStatement,
            Self::Literal,
            Self::None,
        ]
    }
}

impl std::fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classified form of a syntax node: one variant per semantic role,
/// carrying only the attributes valid for that role
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticRecord {
    Function {
        name: Option<String>,
        params: Vec<String>,
        signature: String,
    },
    ClassOrType {
        name: Option<String>,
    },
    VariableDeclaration {
        name: Option<String>,
    },
    Assignment {
        /// Text of the write target (the first child)
        target_name: Option<String>,
    },
    Call {
        /// Bare callee name used for CALLS edge matching
        function_name: Option<String>,
        /// Full dotted text when the callee was found through a member access
        qualified_name: Option<String>,
    },
    IdentifierUse {
        name: String,
    },
    ReturnStatement,
    ControlFlow,
    ExceptionHandling,
    ImportStatement,
    Literal {
        value: String,
    },
    Unclassified,
}

impl SemanticRecord {
    /// The role this record belongs to
    pub fn role(&self) -> SemanticRole {
        match self {
            Self::Function { .. } => SemanticRole::Function,
            Self::ClassOrType { .. } => SemanticRole::ClassOrType,
            Self::VariableDeclaration { .. } => SemanticRole::VariableDeclaration,
            Self::Assignment { .. } => SemanticRole::Assignment,
            Self::Call { .. } => SemanticRole::Call,
            Self::IdentifierUse { .. } => SemanticRole::IdentifierUse,
            Self::ReturnStatement => SemanticRole::ReturnStatement,
            Self::ControlFlow => SemanticRole::ControlFlowStatement,
            Self::ExceptionHandling => SemanticRole::ExceptionHandling,
            Self::ImportStatement => SemanticRole::ImportStatement,
            Self::Literal { .. } => SemanticRole::Literal,
            Self::Unclassified => SemanticRole::None,
        }
    }

    /// The `name` attribute stored on the graph node.
    ///
    /// Only definition-ish and identifier-read records carry one; call targets
    /// and assignment targets are separate attributes so that CALLS matching
    /// only ever resolves against named definitions and reads.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function { name, .. }
            | Self::ClassOrType { name }
            | Self::VariableDeclaration { name } => name.as_deref(),
            Self::IdentifierUse { name } => Some(name),
            _ => None,
        }
    }
}

/// Text of a node, tolerating invalid UTF-8 in the source
pub fn node_text(node: &Node, source: &[u8]) -> String {
    let range = node.start_byte()..node.end_byte();
    String::from_utf8_lossy(&source[range]).into_owned()
}

fn first_child_of_kinds<'a>(node: &Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| kinds.contains(&c.kind()))
}

/// Classify a raw syntax node into its semantic record.
///
/// Pure function of the node shape and source bytes; dispatch is by raw node
/// kind over the tables in [`kinds`].
pub fn classify(node: &Node, source: &[u8]) -> SemanticRecord {
    // Anonymous tokens (keywords, punctuation) share kind strings with real
    // grammar nodes ("function", "return", …) but carry no semantics of
    // their own
    if !node.is_named() {
        return SemanticRecord::Unclassified;
    }

    let kind = node.kind();

    if kinds::FUNCTION_KINDS.contains(&kind) {
        return classify_function(node, source);
    }

    if kinds::CLASS_KINDS.contains(&kind) {
        let name =
            first_child_of_kinds(node, kinds::IDENTIFIER_KINDS).map(|n| node_text(&n, source));
        return SemanticRecord::ClassOrType { name };
    }

    if kinds::DECLARATION_KINDS.contains(&kind) {
        let name =
            first_child_of_kinds(node, kinds::IDENTIFIER_KINDS).map(|n| node_text(&n, source));
        return SemanticRecord::VariableDeclaration { name };
    }

    if kinds::ASSIGNMENT_KINDS.contains(&kind) {
        let target_name = node.child(0).map(|c| node_text(&c, source));
        return SemanticRecord::Assignment { target_name };
    }

    if kinds::CALL_KINDS.contains(&kind) {
        return classify_call(node, source);
    }

    if kinds::IDENTIFIER_USE_KINDS.contains(&kind) && !is_consumed_by_parent(node) {
        return SemanticRecord::IdentifierUse {
            name: node_text(node, source),
        };
    }

    if kinds::RETURN_KINDS.contains(&kind) {
        return SemanticRecord::ReturnStatement;
    }

    if kinds::CONTROL_FLOW_KINDS.contains(&kind) {
        return SemanticRecord::ControlFlow;
    }

    if kinds::EXCEPTION_KINDS.contains(&kind) {
        return SemanticRecord::ExceptionHandling;
    }

    if kinds::IMPORT_KINDS.contains(&kind) {
        return SemanticRecord::ImportStatement;
    }

    if kinds::LITERAL_KINDS.contains(&kind) {
        return SemanticRecord::Literal {
            value: node_text(node, source),
        };
    }

    SemanticRecord::Unclassified
}

/// Whether an identifier was already consumed as an attribute of its parent's
/// classification: the name child of a definition, the callee of a call, a
/// parameter entry, or the write target of an assignment.
///
/// Consumed identifiers are not reads, so they carry no `name` and produce no
/// USES edge — and, critically, a call site's own callee identifier must
/// never satisfy another call's name lookup.
fn is_consumed_by_parent(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let parent_kind = parent.kind();

    // Name child of a function/class/declaration, or callee of a call
    if kinds::FUNCTION_KINDS.contains(&parent_kind)
        || kinds::CLASS_KINDS.contains(&parent_kind)
        || kinds::DECLARATION_KINDS.contains(&parent_kind)
        || kinds::CALL_KINDS.contains(&parent_kind)
    {
        return first_child_of_kinds(&parent, kinds::IDENTIFIER_KINDS)
            .map(|n| n.id())
            == Some(node.id());
    }

    // Parameter entry of a function's parameter list
    if kinds::PARAMETER_LIST_KINDS.contains(&parent_kind) {
        if let Some(grandparent) = parent.parent() {
            if kinds::FUNCTION_KINDS.contains(&grandparent.kind()) {
                return true;
            }
        }
    }

    // Write target of an assignment
    if kinds::ASSIGNMENT_KINDS.contains(&parent_kind) {
        return parent.child(0).map(|c| c.id()) == Some(node.id());
    }

    false
}

fn classify_function(node: &Node, source: &[u8]) -> SemanticRecord {
    let name = first_child_of_kinds(node, kinds::IDENTIFIER_KINDS).map(|n| node_text(&n, source));

    // Identifier-shaped entries of the first parameter-list child
    let mut params = Vec::new();
    if let Some(param_list) = first_child_of_kinds(node, kinds::PARAMETER_LIST_KINDS) {
        let mut cursor = param_list.walk();
        for p in param_list.children(&mut cursor) {
            if kinds::PARAMETER_KINDS.contains(&p.kind()) {
                let text = node_text(&p, source);
                if !text.is_empty() {
                    params.push(text);
                }
            }
        }
    }

    let signature = format!("{}({})", name.as_deref().unwrap_or(""), params.join(", "));

    SemanticRecord::Function {
        name,
        params,
        signature,
    }
}

fn classify_call(node: &Node, source: &[u8]) -> SemanticRecord {
    // Immediate identifier child wins (plain `foo(...)` call shapes)
    if let Some(ident) = first_child_of_kinds(node, kinds::IDENTIFIER_KINDS) {
        return SemanticRecord::Call {
            function_name: Some(node_text(&ident, source)),
            qualified_name: None,
        };
    }

    // Otherwise search shallowly for a member-access shape (`obj.method(...)`)
    // and take the last dotted segment as the bare callee name
    let mut function_name = None;
    let mut qualified_name = None;
    if let Some(member) = find_member_or_identifier(node, 0) {
        let text = node_text(&member, source);
        function_name = text.rsplit('.').next().map(|s| s.to_string());
        qualified_name = Some(text);
    }

    SemanticRecord::Call {
        function_name,
        qualified_name,
    }
}

/// Shallow bounded search for a member-access or identifier node.
///
/// Only the first few children of each level are checked to bound the work
/// on pathological trees.
fn find_member_or_identifier<'a>(node: &Node<'a>, depth: usize) -> Option<Node<'a>> {
    const MAX_DEPTH: usize = 8;
    const CHILDREN_PER_LEVEL: usize = 3;

    if depth > 0 && kinds::MEMBER_ACCESS_KINDS.contains(&node.kind()) {
        return Some(*node);
    }
    if depth >= MAX_DEPTH {
        return None;
    }

    for i in 0..CHILDREN_PER_LEVEL.min(node.child_count()) {
        if let Some(child) = node.child(i) {
            if let Some(found) = find_member_or_identifier(&child, depth + 1) {
                return Some(found);
            }
        }
    }

    None
}
