//! Parse-and-collect tests across the supported grammars
//!
//! These tests don't require external services.
//! Run with: cargo test --test parser_tests

use impactgraph::graph::collector;
use impactgraph::parser::{CodeParser, ParseError, ParsedSource};
use std::path::{Path, PathBuf};

fn parse(file_name: &str, source: &str) -> ParsedSource {
    let mut parser = CodeParser::new().unwrap();
    parser
        .parse_source(&PathBuf::from(file_name), source.as_bytes().to_vec())
        .unwrap()
}

/// Collect the batch and return the names of function nodes found
fn function_names(file_name: &str, source: &str) -> Vec<String> {
    let parsed = parse(file_name, source);
    let batch = collector::collect("test-repo", &parsed);
    batch
        .nodes
        .iter()
        .filter(|n| n.semantic_type == "function")
        .filter_map(|n| n.name.clone())
        .collect()
}

#[test]
fn test_parser_creation() {
    let parser = CodeParser::new();
    assert!(parser.is_ok(), "Parser should initialize");
}

#[test]
fn test_python_function_extraction() {
    let names = function_names(
        "app.py",
        r#"
def handler(request):
    return process(request)

def process(data):
    return data
"#,
    );
    assert!(names.contains(&"handler".to_string()));
    assert!(names.contains(&"process".to_string()));
}

#[test]
fn test_javascript_function_extraction() {
    let names = function_names(
        "app.js",
        r#"
function render(view) {
    return view;
}
"#,
    );
    assert_eq!(names, vec!["render".to_string()]);
}

#[test]
fn test_typescript_class_extraction() {
    let parsed = parse(
        "service.ts",
        r#"
class UserService {
    find(id: number) {
        return this.repo.get(id);
    }
}
"#,
    );
    let batch = collector::collect("test-repo", &parsed);

    let classes: Vec<_> = batch
        .nodes
        .iter()
        .filter(|n| n.semantic_type == "class_or_type")
        .collect();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name.as_deref(), Some("UserService"));
}

#[test]
fn test_java_method_extraction() {
    let parsed = parse(
        "Main.java",
        r#"
public class Main {
    public static void run(String[] args) {
        helper();
    }
}
"#,
    );
    let batch = collector::collect("test-repo", &parsed);

    assert!(batch
        .nodes
        .iter()
        .any(|n| n.semantic_type == "class_or_type" && n.name.as_deref() == Some("Main")));
    assert!(batch
        .nodes
        .iter()
        .any(|n| n.semantic_type == "function" && n.name.as_deref() == Some("run")));
    assert!(batch.calls.iter().any(|c| c.callee_name == "helper"));
}

#[test]
fn test_go_function_extraction() {
    let names = function_names(
        "main.go",
        r#"
package main

func connect(addr string) error {
    return nil
}
"#,
    );
    assert!(names.contains(&"connect".to_string()));
}

#[test]
fn test_c_function_extraction() {
    let parsed = parse(
        "util.c",
        r#"
int add(int a, int b) {
    return a + b;
}
"#,
    );
    let batch = collector::collect("test-repo", &parsed);
    assert!(batch
        .nodes
        .iter()
        .any(|n| n.semantic_type == "function" && n.kind == "function_definition"));
}

#[test]
fn test_cpp_call_extraction() {
    let parsed = parse(
        "main.cpp",
        r#"
int main() {
    setup();
    return 0;
}
"#,
    );
    let batch = collector::collect("test-repo", &parsed);
    assert!(batch.calls.iter().any(|c| c.callee_name == "setup"));
}

#[test]
fn test_unsupported_extension_is_skip() {
    let mut parser = CodeParser::new().unwrap();
    let err = parser
        .parse_source(&PathBuf::from("README.md"), b"# hello".to_vec())
        .unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedExtension(_)));
    assert!(err.is_skip());
}

#[test]
fn test_missing_file_is_skip() {
    let mut parser = CodeParser::new().unwrap();
    let err = parser
        .parse_file(Path::new("/no/such/file.py"))
        .unwrap_err();
    assert!(matches!(err, ParseError::FileNotFound(_)));
    assert!(err.is_skip());
}

#[test]
fn test_node_ids_carry_file_and_byte_range() {
    let parsed = parse("a.py", "x = 1\n");
    let batch = collector::collect("test-repo", &parsed);

    for node in &batch.nodes {
        assert!(
            node.id.starts_with("a.py:"),
            "id {} must be prefixed by the file path",
            node.id
        );
        let parts: Vec<&str> = node.id.rsplitn(3, ':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<usize>().is_ok(), "end byte must be numeric");
        assert!(parts[1].parse::<usize>().is_ok(), "start byte must be numeric");
    }
}
