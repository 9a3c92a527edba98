//! In-memory mock implementation of GraphStore for testing.
//!
//! Uses `tokio::sync::RwLock` collections and mirrors the store's MATCH/MERGE
//! semantics: edges are only recorded when their endpoints exist, CALLS
//! intents resolve against node names at merge time, and every operation is
//! idempotent. Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory mock implementation of GraphStore for testing.
#[derive(Default)]
pub struct MockGraphStore {
    pub repositories: RwLock<HashSet<String>>,
    /// (repo, path) → updated_at
    pub files: RwLock<HashMap<(String, String), DateTime<Utc>>>,
    /// Repository → File edges as (repo, path)
    pub repo_files: RwLock<HashSet<(String, String)>>,
    /// Node id → record (all attributes replaced on merge)
    pub nodes: RwLock<HashMap<String, SyntaxNodeRecord>>,
    /// (repo, path) → root node id
    pub file_roots: RwLock<HashMap<(String, String), String>>,
    pub contains: RwLock<HashSet<ContainsEdge>>,
    /// Resolved CALLS edges as (caller id, callee id)
    pub calls: RwLock<HashSet<(String, String)>>,
    pub symbols: RwLock<HashSet<String>>,
    pub defines: RwLock<HashSet<SymbolEdge>>,
    pub uses: RwLock<HashSet<SymbolEdge>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of nodes with the given name (test convenience)
    pub async fn node_ids_named(&self, name: &str) -> Vec<String> {
        self.nodes
            .read()
            .await
            .values()
            .filter(|n| n.name.as_deref() == Some(name))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Ids of nodes with the given semantic type (test convenience)
    pub async fn node_ids_of_type(&self, semantic_type: &str) -> Vec<String> {
        self.nodes
            .read()
            .await
            .values()
            .filter(|n| n.semantic_type == semantic_type)
            .map(|n| n.id.clone())
            .collect()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn ensure_repository(&self, repo: &str) -> Result<()> {
        self.repositories.write().await.insert(repo.to_string());
        Ok(())
    }

    async fn upsert_file(&self, repo: &str, path: &str, updated_at: DateTime<Utc>) -> Result<()> {
        self.files
            .write()
            .await
            .insert((repo.to_string(), path.to_string()), updated_at);
        Ok(())
    }

    async fn link_file_to_repository(&self, repo: &str, path: &str) -> Result<()> {
        let key = (repo.to_string(), path.to_string());
        if self.repositories.read().await.contains(repo) && self.files.read().await.contains_key(&key)
        {
            self.repo_files.write().await.insert(key);
        }
        Ok(())
    }

    async fn merge_syntax_nodes(&self, nodes: &[SyntaxNodeRecord]) -> Result<()> {
        let mut store = self.nodes.write().await;
        for node in nodes {
            store.insert(node.id.clone(), node.clone());
        }
        Ok(())
    }

    async fn link_file_root(&self, repo: &str, path: &str, root_id: &str) -> Result<()> {
        let key = (repo.to_string(), path.to_string());
        if self.files.read().await.contains_key(&key)
            && self.nodes.read().await.contains_key(root_id)
        {
            self.file_roots.write().await.insert(key, root_id.to_string());
        }
        Ok(())
    }

    async fn merge_contains_edges(&self, edges: &[ContainsEdge]) -> Result<()> {
        let nodes = self.nodes.read().await;
        let mut contains = self.contains.write().await;
        for edge in edges {
            if nodes.contains_key(&edge.parent) && nodes.contains_key(&edge.child) {
                contains.insert(edge.clone());
            }
        }
        Ok(())
    }

    async fn merge_call_edges(&self, edges: &[CallEdge]) -> Result<()> {
        let nodes = self.nodes.read().await;
        let mut calls = self.calls.write().await;
        for edge in edges {
            if !nodes.contains_key(&edge.caller) {
                continue;
            }
            // Name resolution happens here, at merge time: no matching node,
            // no edge, no placeholder
            for callee in nodes
                .values()
                .filter(|n| n.name.as_deref() == Some(edge.callee_name.as_str()))
            {
                calls.insert((edge.caller.clone(), callee.id.clone()));
            }
        }
        Ok(())
    }

    async fn merge_defines_edges(&self, edges: &[SymbolEdge]) -> Result<()> {
        let nodes = self.nodes.read().await;
        let mut symbols = self.symbols.write().await;
        let mut defines = self.defines.write().await;
        for edge in edges {
            if nodes.contains_key(&edge.node) {
                symbols.insert(edge.symbol.clone());
                defines.insert(edge.clone());
            }
        }
        Ok(())
    }

    async fn merge_uses_edges(&self, edges: &[SymbolEdge]) -> Result<()> {
        let nodes = self.nodes.read().await;
        let mut symbols = self.symbols.write().await;
        let mut uses = self.uses.write().await;
        for edge in edges {
            if nodes.contains_key(&edge.node) {
                symbols.insert(edge.symbol.clone());
                uses.insert(edge.clone());
            }
        }
        Ok(())
    }
}
