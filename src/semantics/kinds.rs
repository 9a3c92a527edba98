//! Raw node-kind tables for semantic classification
//!
//! Each table groups the grammar-specific kind names that map onto one
//! language-agnostic semantic role. These tables are the only
//! language-specific surface of the classifier: supporting a new grammar
//! means extending them, never touching the dispatch logic.

/// Function/method/lambda definitions across the supported grammars
pub const FUNCTION_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "function_declaration",
    "function_definition",
    "function",
    "function_expression",
    "arrow_function",
    "method_definition",
    "generator_function",
    "lambda_expression",
    "lambda",
];

/// Class/interface/type-alias definitions
pub const CLASS_KINDS: &[&str] = &[
    "class_declaration",
    "class_definition",
    "class",
    "interface_declaration",
    "type_alias",
];

/// Variable declaration/declarator forms
pub const DECLARATION_KINDS: &[&str] = &[
    "variable_declarator",
    "variable_declaration",
    "let_declaration",
    "const_declaration",
    "var_declaration",
];

/// Assignment and in-place update expressions
pub const ASSIGNMENT_KINDS: &[&str] = &[
    "assignment_expression",
    "assignment",
    "update_expression",
    "augmented_assignment",
];

/// Call/invocation/instantiation expressions
pub const CALL_KINDS: &[&str] = &[
    "method_invocation",
    "call_expression",
    "call",
    "invoke_expression",
    "function_call",
    "new_expression",
];

/// Identifier-shaped nodes used for name extraction
///
/// `type_identifier` is how the TypeScript grammar names classes and
/// interfaces (JavaScript is parsed with the same grammar).
pub const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "name",
    "simple_identifier",
    "type_identifier",
];

/// Bare identifier reads (a superset of [`IDENTIFIER_KINDS`])
pub const IDENTIFIER_USE_KINDS: &[&str] = &[
    "identifier",
    "name",
    "simple_identifier",
    "shorthand_property_identifier",
];

/// Parameter-list containers under a function-like node
pub const PARAMETER_LIST_KINDS: &[&str] = &["formal_parameters", "parameters", "parameter_list"];

/// Parameter entries inside a parameter list
pub const PARAMETER_KINDS: &[&str] = &[
    "identifier",
    "parameter",
    "typed_parameter",
    "assignment_pattern",
    "required_parameter",
];

/// Member-access-shaped nodes searched for a call target when no direct
/// identifier child exists (identifier kinds included as terminals)
pub const MEMBER_ACCESS_KINDS: &[&str] = &[
    "member_expression",
    "field_access",
    "attribute",
    "property_access",
    "dot_member_expression",
    "identifier",
    "name",
];

/// Return statements
pub const RETURN_KINDS: &[&str] = &["return_statement", "return"];

/// Branching and looping statements
pub const CONTROL_FLOW_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
    "break_statement",
    "continue_statement",
];

/// Exception handling constructs
pub const EXCEPTION_KINDS: &[&str] = &[
    "try_statement",
    "catch_clause",
    "throw_statement",
    "finally_clause",
];

/// Import/use declarations
pub const IMPORT_KINDS: &[&str] = &[
    "import_statement",
    "use_declaration",
    "namespace_import",
    "import_declaration",
];

/// Literal values
pub const LITERAL_KINDS: &[&str] = &[
    "string_literal",
    "number_literal",
    "true",
    "false",
    "null",
    "integer",
    "float",
    "list_literal",
    "object_literal",
];

/// Structural anchor kinds: always embedded, even when role classification
/// fails. These are the spine of the syntax tree.
pub const ANCHOR_KINDS: &[&str] = &[
    "function_declaration",
    "function_definition",
    "method_declaration",
    "class_declaration",
    "class_definition",
];
