//! Impactgraph
//!
//! Builds a persistent, queryable knowledge graph of a repository's abstract
//! syntax:
//! - Tree-sitter parsing for the supported source languages
//! - Language-agnostic semantic classification of every syntax node
//! - Vector embeddings for the nodes that matter for impact analysis
//! - Idempotent bulk merges into a Neo4j property graph
//!
//! The graph feeds downstream hybrid (vector + full-text) retrieval for
//! change-impact analysis; that layer, repository acquisition, and the web
//! dashboard are external collaborators.

pub mod embeddings;
pub mod graph;
pub mod neo4j;
pub mod parser;
pub mod semantics;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub embedding: EmbeddingYamlConfig,
    pub ingest: IngestYamlConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "impactgraph123".into(),
        }
    }
}

/// Embedding service configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingYamlConfig {
    /// OpenAI-compatible `/v1/embeddings` endpoint (Ollama by default)
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Must match the model output and the Neo4j vector index
    pub dimensions: usize,
}

impl Default for EmbeddingYamlConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434/v1/embeddings".into(),
            model: "nomic-embed-text".into(),
            api_key: None,
            dimensions: 768,
        }
    }
}

/// Ingestion configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestYamlConfig {
    /// Number of concurrent per-file workers
    pub workers: usize,
    /// Restrict the file walker to these extensions (defaults to every
    /// extension the grammar registry supports)
    pub extensions: Option<Vec<String>>,
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            extensions: None,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_dimensions: usize,
    pub ingest_workers: usize,
    pub ingest_extensions: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            embedding_url: std::env::var("EMBEDDING_URL").unwrap_or(yaml.embedding.url),
            embedding_model: std::env::var("EMBEDDING_MODEL").unwrap_or(yaml.embedding.model),
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .or(yaml.embedding.api_key),
            embedding_dimensions: std::env::var("EMBEDDING_DIMENSIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.embedding.dimensions),
            ingest_workers: std::env::var("INGEST_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.ingest.workers),
            ingest_extensions: yaml.ingest.extensions,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
///
/// Clients are constructed once at process start and injected everywhere as
/// trait objects; there are no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn neo4j::GraphStore>,
    pub embedder: Arc<dyn embeddings::EmbeddingProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with all services initialized
    pub async fn new(config: Config) -> Result<Self> {
        let graph = Arc::new(
            neo4j::client::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
                config.embedding_dimensions,
            )
            .await?,
        );

        let embedder = Arc::new(embeddings::HttpEmbeddingProvider::new(
            config.embedding_url.clone(),
            config.embedding_model.clone(),
            config.embedding_api_key.clone(),
            config.embedding_dimensions,
        ));

        Ok(Self {
            graph,
            embedder,
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
neo4j:
  uri: bolt://db:7687
  user: admin
  password: secret

embedding:
  url: http://embed:11434/v1/embeddings
  model: jina-code-v2
  dimensions: 1024

ingest:
  workers: 8
  extensions: ["py", "ts"]
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.neo4j.user, "admin");
        assert_eq!(config.embedding.model, "jina-code-v2");
        assert_eq!(config.embedding.dimensions, 1024);
        assert_eq!(config.ingest.workers, 8);
        assert_eq!(
            config.ingest.extensions,
            Some(vec!["py".to_string(), "ts".to_string()])
        );
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.embedding.url, "http://localhost:11434/v1/embeddings");
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert_eq!(config.embedding.dimensions, 768);
        assert_eq!(config.ingest.workers, 4);
        assert!(config.ingest.extensions.is_none());
    }

    /// Combined test for YAML file loading and env var overrides.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &[
                "NEO4J_URI",
                "NEO4J_USER",
                "NEO4J_PASSWORD",
                "EMBEDDING_URL",
                "EMBEDDING_MODEL",
                "EMBEDDING_API_KEY",
                "EMBEDDING_DIMENSIONS",
                "INGEST_WORKERS",
            ] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
neo4j:
  uri: bolt://yaml-host:7687
  user: yaml-user
  password: yaml-pass
embedding:
  model: yaml-model
  dimensions: 512
ingest:
  workers: 2
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://yaml-host:7687");
        assert_eq!(config.neo4j_user, "yaml-user");
        assert_eq!(config.embedding_model, "yaml-model");
        assert_eq!(config.embedding_dimensions, 512);
        assert_eq!(config.ingest_workers, 2);

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("NEO4J_URI", "bolt://env-host:7687");
        std::env::set_var("EMBEDDING_DIMENSIONS", "2048");
        std::env::set_var("INGEST_WORKERS", "16");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://env-host:7687");
        assert_eq!(config.embedding_dimensions, 2048);
        assert_eq!(config.ingest_workers, 16);
        // YAML value still used where no env override
        assert_eq!(config.neo4j_user, "yaml-user");

        clear_env();

        // --- Phase 3: No YAML file → defaults ---
        let nonexistent = Path::new("/tmp/nonexistent-config-12345.yaml");
        let config = Config::from_yaml_and_env(Some(nonexistent)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://localhost:7687");
        assert_eq!(config.embedding_dimensions, 768);
        assert_eq!(config.ingest_workers, 4);
    }
}
