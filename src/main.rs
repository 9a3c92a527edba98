//! Impactgraph CLI
//!
//! Ingests a checked-out repository into the Neo4j syntax knowledge graph.

use anyhow::Result;
use clap::{Parser, Subcommand};
use impactgraph::graph::{IngestEngine, IngestRunner};
use impactgraph::{AppState, Config};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "impactgraph")]
#[command(about = "Repository AST knowledge-graph ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a repository checkout into the knowledge graph
    Ingest {
        /// Repository display name (graph identity)
        #[arg(short, long)]
        name: String,

        /// Path to the checked-out repository
        #[arg(short, long, default_value = ".")]
        path: String,

        /// Worker-pool size (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Create the graph schema (constraints, indexes, vector + full-text)
    InitSchema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,impactgraph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Ingest {
            name,
            path,
            workers,
        } => run_ingest(config, &name, &path, workers).await,
        Commands::InitSchema => {
            // Connecting runs schema setup; nothing else to do
            AppState::new(config).await?;
            tracing::info!("Graph schema initialized");
            Ok(())
        }
    }
}

async fn run_ingest(
    config: Config,
    repo_name: &str,
    path: &str,
    workers: Option<usize>,
) -> Result<()> {
    tracing::info!("Ingesting {} as repo {}", path, repo_name);

    let workers = workers.unwrap_or(config.ingest_workers);
    let extensions = config.ingest_extensions.clone();

    let state = AppState::new(config).await?;
    tracing::info!(
        "Connected to Neo4j; embedding model {} ({} dimensions)",
        state.embedder.model_name(),
        state.embedder.dimensions()
    );

    let engine = Arc::new(IngestEngine::new(
        state.graph.clone(),
        state.embedder.clone(),
    ));
    let runner = IngestRunner::new(engine, workers, extensions);

    // Ctrl-C stops between files; in-flight files finish or are retried next run
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping after in-flight files");
                cancel.cancel();
            }
        });
    }

    let report = runner
        .ingest_directory(repo_name, std::path::Path::new(path), &cancel)
        .await?;

    tracing::info!(
        "Ingestion finished: {} files ingested, {} skipped, {} failed",
        report.files_ingested,
        report.files_skipped,
        report.files_failed
    );

    Ok(())
}
