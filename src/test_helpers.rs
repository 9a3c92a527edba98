//! Test helper factories and mock state builders
//!
//! Convenience constructors wiring the in-memory graph store and the
//! deterministic embedding provider into the ingestion pipeline.
#![allow(dead_code)]

use crate::embeddings::MockEmbeddingProvider;
use crate::graph::{IngestEngine, IngestRunner};
use crate::neo4j::mock::MockGraphStore;
use crate::parser::{CodeParser, ParsedSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Embedding dimensions used across the mock pipeline
pub const MOCK_DIMENSIONS: usize = 16;

/// Build an ingestion engine over fresh mocks, returning the store for
/// assertions
pub fn mock_engine() -> (Arc<MockGraphStore>, Arc<IngestEngine>) {
    let store = Arc::new(MockGraphStore::new());
    let embedder = Arc::new(MockEmbeddingProvider::new(MOCK_DIMENSIONS));
    let engine = Arc::new(IngestEngine::new(store.clone(), embedder));
    (store, engine)
}

/// Build a single-worker runner over fresh mocks
pub fn mock_runner() -> (Arc<MockGraphStore>, IngestRunner) {
    let (store, engine) = mock_engine();
    (store, IngestRunner::new(engine, 1, None))
}

/// Parse an in-memory source snippet under the given file name
pub fn parse_fixture(file_name: &str, source: &str) -> ParsedSource {
    let mut parser = CodeParser::new().expect("parser init");
    parser
        .parse_source(&PathBuf::from(file_name), source.as_bytes().to_vec())
        .expect("fixture should parse")
}
