//! Graph data store - lookups, traversal, and derived statistics.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::node::{GraphLink, GraphNode, NodeType};

/// Structural problems detected by [`GraphData::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A link endpoint names a node that does not exist.
    #[error("link endpoint references unknown node `{0}`")]
    DanglingLink(String),

    /// Two nodes share the same id.
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
}

/// The complete conceptual graph: nodes plus labeled relationships.
///
/// Nodes and links keep their insertion order so renderers draw the catalog
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.push(node);
    }

    /// Add a link to the graph.
    pub fn add_link(&mut self, link: GraphLink) {
        self.links.push(link);
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check whether a node with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// All links touching the given node, in catalog order.
    pub fn links_of(&self, id: &str) -> Vec<&GraphLink> {
        self.links.iter().filter(|l| l.touches(id)).collect()
    }

    /// Nodes connected to the given node by any link, in either direction.
    ///
    /// This is the selection context shown alongside a focused node.
    pub fn neighbors(&self, id: &str) -> Vec<&GraphNode> {
        let mut seen = HashSet::new();
        let mut neighbors = Vec::new();

        for link in self.links.iter().filter(|l| l.touches(id)) {
            let other = if link.source == id {
                &link.target
            } else {
                &link.source
            };
            if seen.insert(other.as_str()) {
                if let Some(node) = self.node(other) {
                    neighbors.push(node);
                }
            }
        }

        neighbors
    }

    /// Ids of every node, in catalog order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Count of nodes per kind, in a deterministic order.
    pub fn type_distribution(&self) -> BTreeMap<NodeType, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type).or_insert(0) += 1;
        }
        counts
    }

    /// Check structural integrity: unique node ids, no dangling link
    /// endpoints.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        for link in &self.links {
            if !ids.contains(link.source.as_str()) {
                return Err(GraphError::DanglingLink(link.source.clone()));
            }
            if !ids.contains(link.target.as_str()) {
                return Err(GraphError::DanglingLink(link.target.clone()));
            }
        }

        Ok(())
    }
}
