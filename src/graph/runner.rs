//! Repository-level ingestion runner
//!
//! Walks a checked-out repository, selects source files by extension, and
//! drives per-file ingestion through a bounded pool of workers. Each worker
//! owns its own `CodeParser` (tree-sitter parsers are not `Sync`) and checks
//! the cancellation token between files; per-file ingestion itself is never
//! interrupted mid-flight, so a cancelled file is simply not attempted and a
//! killed run re-ingests unfinished files next time.

use super::engine::IngestEngine;
use crate::parser::{CodeParser, SupportedLanguage};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

/// Result of an ingestion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub files_ingested: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: &IngestReport) {
        self.files_ingested += other.files_ingested;
        self.files_skipped += other.files_skipped;
        self.files_failed += other.files_failed;
    }
}

/// Directory names never descended into during the walk
const SKIP_DIR_MARKERS: &[&str] = &["node_modules", "/target/", "/.git/", "__pycache__"];

/// Drives repository ingestion over a worker pool.
pub struct IngestRunner {
    engine: Arc<IngestEngine>,
    workers: usize,
    extensions: Option<Vec<String>>,
}

impl IngestRunner {
    /// Create a runner with the given worker-pool size.
    ///
    /// `extensions` restricts the file walk to a subset of the registry's
    /// extensions; `None` accepts everything the registry supports.
    pub fn new(engine: Arc<IngestEngine>, workers: usize, extensions: Option<Vec<String>>) -> Self {
        Self {
            engine,
            workers: workers.max(1),
            extensions,
        }
    }

    /// Ingest every source file under `dir` into the named repository graph.
    pub async fn ingest_directory(
        &self,
        repo: &str,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let files = self.list_source_files(dir);
        tracing::info!(
            "Found {} source files under {} for repo {}",
            files.len(),
            dir.display(),
            repo
        );
        self.ingest_paths(repo, files, cancel).await
    }

    /// Ingest an explicit list of file paths (the shape repository
    /// acquisition hands us).
    pub async fn ingest_paths(
        &self,
        repo: &str,
        paths: Vec<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let (tx, rx) = mpsc::channel::<PathBuf>(self.workers * 2);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let mut workers = JoinSet::new();
        for _ in 0..self.workers {
            let engine = self.engine.clone();
            let repo = repo.to_string();
            let rx = rx.clone();
            let cancel = cancel.clone();

            workers.spawn(async move {
                let mut report = IngestReport::default();
                let mut parser = match CodeParser::new() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::error!("Failed to initialize parser: {}", e);
                        return report;
                    }
                };

                loop {
                    // Cancellation is checked between files only
                    if cancel.is_cancelled() {
                        break;
                    }
                    let path = match rx.lock().await.recv().await {
                        Some(path) => path,
                        None => break,
                    };
                    ingest_one(&engine, &repo, &mut parser, &path, &mut report).await;
                }

                report
            });
        }
        drop(rx);

        for path in paths {
            if cancel.is_cancelled() {
                tracing::info!("Ingestion cancelled; remaining files left for the next run");
                break;
            }
            if tx.send(path).await.is_err() {
                break;
            }
        }
        drop(tx);

        let mut report = IngestReport::default();
        while let Some(worker_report) = workers.join_next().await {
            report.absorb(&worker_report?);
        }

        tracing::info!(
            "Ingestion complete for repo {}: {} ingested, {} skipped, {} failed",
            repo,
            report.files_ingested,
            report.files_skipped,
            report.files_failed
        );

        Ok(report)
    }

    /// Walk a directory for files whose extensions the registry supports
    fn list_source_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                let path_str = path.to_string_lossy();
                if SKIP_DIR_MARKERS.iter().any(|m| path_str.contains(m)) {
                    return false;
                }
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                self.accepts_extension(ext)
            })
            .collect()
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        match &self.extensions {
            Some(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
            None => SupportedLanguage::from_extension(ext).is_some(),
        }
    }
}

/// Ingest a single file, folding the outcome into the worker's report.
///
/// Per-file failures are isolated: they are logged with the path and error,
/// counted, and never abort the run.
async fn ingest_one(
    engine: &IngestEngine,
    repo: &str,
    parser: &mut CodeParser,
    path: &Path,
    report: &mut IngestReport,
) {
    tracing::info!("Parsing {}", path.display());

    let parsed = match parser.parse_file(path) {
        Ok(parsed) => parsed,
        Err(e) if e.is_skip() => {
            tracing::warn!("Skipping {}: {}", path.display(), e);
            report.files_skipped += 1;
            return;
        }
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            report.files_failed += 1;
            return;
        }
    };

    match engine.ingest_file(repo, &parsed).await {
        Ok(node_count) => {
            tracing::info!("Ingested {} ({} nodes)", path.display(), node_count);
            report.files_ingested += 1;
        }
        Err(e) => {
            tracing::warn!("Failed to ingest {}: {}", path.display(), e);
            report.files_failed += 1;
        }
    }
}
