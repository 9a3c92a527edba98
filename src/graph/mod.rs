//! Graph assembly and upsert engine
//!
//! Turns a parsed file into graph state in three stages:
//!
//! - [`collector`] — one explicit-stack traversal of the syntax tree,
//!   producing the full node batch plus containment/call/define/use edge
//!   intents for the file
//! - [`engine`] — fills embeddings and executes the ordered, idempotent
//!   upsert steps against the [`GraphStore`](crate::neo4j::GraphStore)
//! - [`runner`] — walks a repository checkout and drives per-file ingestion
//!   through a bounded worker pool with cooperative cancellation

pub mod collector;
pub mod engine;
pub mod runner;

pub use collector::FileBatch;
pub use engine::IngestEngine;
pub use runner::{IngestReport, IngestRunner};
