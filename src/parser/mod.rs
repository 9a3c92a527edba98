//! Tree-sitter based grammar registry and file parser
//!
//! Maps file extensions to tree-sitter grammars and produces a syntax tree
//! together with the raw source bytes. Adding a language means one new enum
//! variant and its match arms; nothing else in the pipeline changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Language, Parser, Tree};

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Python,
    TypeScript,
    Java,
    Go,
    C,
    Cpp,
}

impl SupportedLanguage {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::TypeScript), // Use TS parser for JS
            "java" => Some(Self::Java),
            "go" => Some(Self::Go),
            "c" | "h" => Some(Self::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Some(Self::Cpp),
            _ => None,
        }
    }

    /// Get the tree-sitter language
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::C => tree_sitter_c::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Get the language name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Go => "go",
            Self::C => "c",
            Self::Cpp => "cpp",
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Self] {
        &[
            Self::Python,
            Self::TypeScript,
            Self::Java,
            Self::Go,
            Self::C,
            Self::Cpp,
        ]
    }

    /// Every file extension the registry accepts
    pub fn extensions() -> &'static [&'static str] {
        &[
            "py", "pyi", // Python
            "ts", "tsx", "js", "jsx", "mjs", "cjs", // TypeScript/JavaScript
            "java", // Java
            "go",   // Go
            "c", "h", // C
            "cpp", "cc", "cxx", "hpp", "hxx", "hh", // C++
        ]
    }
}

/// Why a file could not be parsed.
///
/// `UnsupportedExtension` and `FileNotFound` are per-file skips; everything
/// else is a per-file failure. Neither aborts the ingestion run.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load grammar for {0:?}")]
    Grammar(SupportedLanguage),

    #[error("parser produced no tree for {0}")]
    NoTree(PathBuf),
}

impl ParseError {
    /// True when the file should be counted as skipped rather than failed
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            ParseError::UnsupportedExtension(_) | ParseError::FileNotFound(_)
        )
    }
}

/// A parsed source file: syntax tree plus the raw bytes it was parsed from
pub struct ParsedSource {
    pub path: String,
    pub language: SupportedLanguage,
    pub content: Vec<u8>,
    pub tree: Tree,
}

/// Code parser using tree-sitter
pub struct CodeParser {
    parsers: HashMap<SupportedLanguage, Parser>,
}

impl CodeParser {
    /// Create a new code parser with every registered grammar loaded
    pub fn new() -> Result<Self, ParseError> {
        let mut parsers = HashMap::new();

        for lang in SupportedLanguage::all() {
            let mut parser = Parser::new();
            parser
                .set_language(&lang.tree_sitter_language())
                .map_err(|_| ParseError::Grammar(*lang))?;
            parsers.insert(*lang, parser);
        }

        Ok(Self { parsers })
    }

    /// Parse a file from disk
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedSource, ParseError> {
        if !path.exists() {
            return Err(ParseError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_source(path, content)
    }

    /// Parse already-loaded source bytes
    ///
    /// Tree-sitter is error-tolerant: malformed source yields a best-effort
    /// tree, which the engine ingests like any other.
    pub fn parse_source(
        &mut self,
        path: &Path,
        content: Vec<u8>,
    ) -> Result<ParsedSource, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let language = SupportedLanguage::from_extension(ext)
            .ok_or_else(|| ParseError::UnsupportedExtension(ext.to_string()))?;

        let parser = self
            .parsers
            .get_mut(&language)
            .ok_or(ParseError::Grammar(language))?;

        let tree = parser
            .parse(&content, None)
            .ok_or_else(|| ParseError::NoTree(path.to_path_buf()))?;

        Ok(ParsedSource {
            path: path.to_string_lossy().to_string(),
            language,
            content,
            tree,
        })
    }
}
