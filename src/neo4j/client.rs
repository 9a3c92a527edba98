//! Neo4j client for the syntax knowledge graph
//!
//! All writes are bulk `UNWIND … MERGE` statements so that re-running a
//! file's ingestion converges on the same graph instead of duplicating it.

use super::models::*;
use super::traits::GraphStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo4rs::{query, BoltList, BoltMap, BoltNull, BoltType, Graph};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
    /// Embedding dimensionality used when creating the vector index
    dimensions: usize,
}

// ============================================================================
// Bolt conversion helpers
// ============================================================================

fn bolt_list(items: impl IntoIterator<Item = BoltType>) -> BoltType {
    let mut list = BoltList::default();
    for item in items {
        list.push(item);
    }
    BoltType::List(list)
}

fn bolt_string(s: &str) -> BoltType {
    BoltType::from(s.to_string())
}

fn bolt_opt_string(s: &Option<String>) -> BoltType {
    match s {
        Some(s) => bolt_string(s),
        None => BoltType::Null(BoltNull),
    }
}

fn bolt_floats(values: &[f32]) -> BoltType {
    bolt_list(values.iter().map(|v| BoltType::from(*v as f64)))
}

fn node_to_bolt(node: &SyntaxNodeRecord) -> BoltType {
    let mut map = BoltMap::default();
    map.put("id".into(), bolt_string(&node.id));
    map.put("kind".into(), bolt_string(&node.kind));
    map.put("semantic_type".into(), bolt_string(&node.semantic_type));
    map.put("name".into(), bolt_opt_string(&node.name));
    map.put("text".into(), bolt_string(&node.text));
    map.put("file".into(), bolt_string(&node.file));
    map.put("repo".into(), bolt_string(&node.repo));
    map.put("embedding".into(), bolt_floats(&node.embedding));
    BoltType::Map(map)
}

fn contains_to_bolt(edge: &ContainsEdge) -> BoltType {
    let mut map = BoltMap::default();
    map.put("parent".into(), bolt_string(&edge.parent));
    map.put("child".into(), bolt_string(&edge.child));
    BoltType::Map(map)
}

fn call_to_bolt(edge: &CallEdge) -> BoltType {
    let mut map = BoltMap::default();
    map.put("caller".into(), bolt_string(&edge.caller));
    map.put("callee_name".into(), bolt_string(&edge.callee_name));
    BoltType::Map(map)
}

fn symbol_to_bolt(edge: &SymbolEdge) -> BoltType {
    let mut map = BoltMap::default();
    map.put("node".into(), bolt_string(&edge.node));
    map.put("symbol".into(), bolt_string(&edge.symbol));
    BoltType::Map(map)
}

impl Neo4jClient {
    /// Connect to Neo4j and initialize the schema
    pub async fn new(uri: &str, user: &str, password: &str, dimensions: usize) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {}", uri))?;

        let client = Self {
            graph: Arc::new(graph),
            dimensions,
        };

        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes.
    ///
    /// One-time setup, tolerant of already-existing objects; never part of
    /// per-file ingestion.
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT repository_name IF NOT EXISTS FOR (r:Repository) REQUIRE r.name IS UNIQUE",
            "CREATE CONSTRAINT syntax_node_id IF NOT EXISTS FOR (n:SyntaxNode) REQUIRE n.id IS UNIQUE",
            "CREATE CONSTRAINT symbol_name IF NOT EXISTS FOR (s:Symbol) REQUIRE s.name IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX file_path_repo IF NOT EXISTS FOR (f:File) ON (f.path, f.repo)",
            "CREATE INDEX syntax_node_name IF NOT EXISTS FOR (n:SyntaxNode) ON (n.name)",
            "CREATE INDEX syntax_node_file IF NOT EXISTS FOR (n:SyntaxNode) ON (n.file)",
            "CREATE INDEX syntax_node_semantic_type IF NOT EXISTS FOR (n:SyntaxNode) ON (n.semantic_type)",
        ];

        // Hybrid-retrieval indexes: HNSW cosine vector index plus full-text,
        // under the names the retrieval layer expects
        let vector_index = format!(
            r#"CREATE VECTOR INDEX astVectorIndex IF NOT EXISTS
               FOR (n:SyntaxNode) ON (n.embedding)
               OPTIONS {{indexConfig: {{
                   `vector.dimensions`: {},
                   `vector.similarity_function`: 'cosine'
               }}}}"#,
            self.dimensions
        );

        let fulltext_index = r#"CREATE FULLTEXT INDEX astFulltextIndex IF NOT EXISTS
               FOR (n:SyntaxNode) ON EACH [n.text, n.name, n.semantic_type]"#;

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        // Vector index requires Neo4j 5.13+ — don't fail startup without it
        if let Err(e) = self.graph.run(query(&vector_index)).await {
            tracing::warn!(
                "Vector index creation skipped (Neo4j may not support vector indexes): {}",
                e
            );
        }

        if let Err(e) = self.graph.run(query(fulltext_index)).await {
            tracing::warn!("Full-text index may already exist: {}", e);
        }

        Ok(())
    }

    /// Number of syntax nodes currently stored for one file
    pub async fn count_syntax_nodes(&self, repo: &str, file: &str) -> Result<i64> {
        let q = query(
            r#"
            MATCH (n:SyntaxNode {repo: $repo, file: $file})
            RETURN count(n) AS total
            "#,
        )
        .param("repo", repo)
        .param("file", file);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let total: i64 = row.get("total")?;
            Ok(total)
        } else {
            Ok(0)
        }
    }

    /// Number of CALLS edges between nodes of one repository
    pub async fn count_call_edges(&self, repo: &str) -> Result<i64> {
        let q = query(
            r#"
            MATCH (a:SyntaxNode {repo: $repo})-[r:CALLS]->(:SyntaxNode {repo: $repo})
            RETURN count(r) AS total
            "#,
        )
        .param("repo", repo);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let total: i64 = row.get("total")?;
            Ok(total)
        } else {
            Ok(0)
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn ensure_repository(&self, repo: &str) -> Result<()> {
        let q = query(
            r#"
            MERGE (:Repository {name: $repo})
            "#,
        )
        .param("repo", repo);

        self.graph.run(q).await?;
        Ok(())
    }

    async fn upsert_file(&self, repo: &str, path: &str, updated_at: DateTime<Utc>) -> Result<()> {
        let q = query(
            r#"
            MERGE (f:File {path: $path, repo: $repo})
            SET f.updated_at = datetime($updated_at)
            "#,
        )
        .param("path", path)
        .param("repo", repo)
        .param("updated_at", updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn link_file_to_repository(&self, repo: &str, path: &str) -> Result<()> {
        let q = query(
            r#"
            MATCH (r:Repository {name: $repo})
            MATCH (f:File {path: $path, repo: $repo})
            MERGE (r)-[:HAS_FILE]->(f)
            "#,
        )
        .param("repo", repo)
        .param("path", path);

        self.graph.run(q).await?;
        Ok(())
    }

    async fn merge_syntax_nodes(&self, nodes: &[SyntaxNodeRecord]) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }

        let q = query(
            r#"
            UNWIND $nodes AS n
            MERGE (a:SyntaxNode {id: n.id})
            SET a.kind = n.kind,
                a.semantic_type = n.semantic_type,
                a.name = n.name,
                a.text = n.text,
                a.file = n.file,
                a.repo = n.repo,
                a.embedding = n.embedding
            "#,
        )
        .param("nodes", bolt_list(nodes.iter().map(node_to_bolt)));

        self.graph.run(q).await?;
        Ok(())
    }

    async fn link_file_root(&self, repo: &str, path: &str, root_id: &str) -> Result<()> {
        // An edit changes the root's byte range and therefore its id; the
        // stale HAS_ROOT edge must go so the file keeps exactly one root
        let q = query(
            r#"
            MATCH (f:File {path: $path, repo: $repo})
            MATCH (n:SyntaxNode {id: $root})
            MERGE (f)-[:HAS_ROOT]->(n)
            WITH f, n
            MATCH (f)-[stale:HAS_ROOT]->(other)
            WHERE other <> n
            DELETE stale
            "#,
        )
        .param("path", path)
        .param("repo", repo)
        .param("root", root_id);

        self.graph.run(q).await?;
        Ok(())
    }

    async fn merge_contains_edges(&self, edges: &[ContainsEdge]) -> Result<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let q = query(
            r#"
            UNWIND $rels AS r
            MATCH (p:SyntaxNode {id: r.parent})
            MATCH (c:SyntaxNode {id: r.child})
            MERGE (p)-[:CONTAINS]->(c)
            "#,
        )
        .param("rels", bolt_list(edges.iter().map(contains_to_bolt)));

        self.graph.run(q).await?;
        Ok(())
    }

    async fn merge_call_edges(&self, edges: &[CallEdge]) -> Result<()> {
        if edges.is_empty() {
            return Ok(());
        }

        // The MATCH on callee name is the whole resolution policy: an intent
        // with no matching node simply produces no row, hence no edge and no
        // placeholder
        let q = query(
            r#"
            UNWIND $calls AS row
            MATCH (caller:SyntaxNode {id: row.caller})
            MATCH (callee:SyntaxNode {name: row.callee_name})
            MERGE (caller)-[:CALLS]->(callee)
            "#,
        )
        .param("calls", bolt_list(edges.iter().map(call_to_bolt)));

        self.graph.run(q).await?;
        Ok(())
    }

    async fn merge_defines_edges(&self, edges: &[SymbolEdge]) -> Result<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let q = query(
            r#"
            UNWIND $defs AS row
            MATCH (n:SyntaxNode {id: row.node})
            MERGE (v:Symbol {name: row.symbol})
            MERGE (n)-[:DEFINES]->(v)
            "#,
        )
        .param("defs", bolt_list(edges.iter().map(symbol_to_bolt)));

        self.graph.run(q).await?;
        Ok(())
    }

    async fn merge_uses_edges(&self, edges: &[SymbolEdge]) -> Result<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let q = query(
            r#"
            UNWIND $uses AS row
            MATCH (n:SyntaxNode {id: row.node})
            MERGE (v:Symbol {name: row.symbol})
            MERGE (n)-[:USES]->(v)
            "#,
        )
        .param("uses", bolt_list(edges.iter().map(symbol_to_bolt)));

        self.graph.run(q).await?;
        Ok(())
    }
}
