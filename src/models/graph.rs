//! Knowledge graph: core ticker -> downstream neighbor tickers.
//!
//! Loaded once at start-up and read-only afterwards; shared by reference
//! across every worker without locking.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

const UNKNOWN_SECTOR: &str = "Unknown";

fn unknown_sector() -> String {
    UNKNOWN_SECTOR.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KnowledgeGraphNode {
    /// Filled from the config key on load
    #[serde(skip)]
    pub ticker: String,
    #[serde(default)]
    pub neighbors: Vec<String>,
    #[serde(default = "unknown_sector")]
    pub sector: String,
    /// Free-text explanation of why the neighbors should follow the core
    #[serde(default, rename = "ripple_logic", alias = "rationale")]
    pub rationale: String,
}

impl KnowledgeGraphNode {
    pub fn new(ticker: &str, neighbors: &[&str], sector: &str, rationale: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            neighbors: neighbors.iter().map(|n| n.to_string()).collect(),
            sector: sector.to_string(),
            rationale: rationale.to_string(),
        }
    }
}

/// Core tickers keep the order they have in the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeGraph {
    nodes: IndexMap<String, KnowledgeGraphNode>,
}

impl KnowledgeGraph {
    pub fn from_nodes(nodes: impl IntoIterator<Item = KnowledgeGraphNode>) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|mut node| {
                // Neighbors are a set: drop repeats, keep config order
                let unique: IndexSet<String> = node.neighbors.drain(..).collect();
                node.neighbors = unique.into_iter().collect();
                (node.ticker.clone(), node)
            })
            .collect();
        Self { nodes }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: IndexMap<String, KnowledgeGraphNode> =
            serde_json::from_str(text).context("Failed to parse knowledge graph JSON")?;
        Ok(Self::from_nodes(raw.into_iter().map(|(ticker, mut node)| {
            node.ticker = ticker;
            node
        })))
    }

    pub fn load(path: &Path) -> Result<Self, ScoutError> {
        let config_missing = |reason: String| ScoutError::ConfigMissing {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_missing(e.to_string()))?;
        Self::from_json_str(&text).map_err(|e| config_missing(format!("{:#}", e)))
    }

    /// A missing or malformed config yields an empty graph (zero core
    /// tickers), which every command handles as a normal terminal state.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(graph) => graph,
            Err(e) => {
                log::warn!("⚠️  {}. Continuing with an empty graph.", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, core_ticker: &str) -> Option<&KnowledgeGraphNode> {
        self.nodes.get(core_ticker)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &KnowledgeGraphNode> {
        self.nodes.values()
    }

    pub fn core_tickers(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Empty for tickers that are not core tickers.
    pub fn neighbors(&self, core_ticker: &str) -> &[String] {
        self.nodes
            .get(core_ticker)
            .map(|node| node.neighbors.as_slice())
            .unwrap_or(&[])
    }

    pub fn sector(&self, core_ticker: &str) -> &str {
        self.nodes
            .get(core_ticker)
            .map(|node| node.sector.as_str())
            .unwrap_or(UNKNOWN_SECTOR)
    }

    pub fn rationale(&self, core_ticker: &str) -> &str {
        self.nodes
            .get(core_ticker)
            .map(|node| node.rationale.as_str())
            .unwrap_or("")
    }

    /// Every neighbor ticker across the graph, first-seen order.
    pub fn all_neighbors(&self) -> Vec<String> {
        self.nodes
            .values()
            .flat_map(|node| node.neighbors.iter().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Core and neighbor tickers together, sorted and unique.
    pub fn all_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .nodes
            .keys()
            .cloned()
            .chain(self.all_neighbors())
            .collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }
}
