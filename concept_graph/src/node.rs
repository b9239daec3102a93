//! Node and link definitions for the conceptual graph.

use serde::{Deserialize, Serialize};

/// Kinds of nodes in the conceptual graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    /// An autonomous agent.
    Character,
    /// A layer or space agents operate within.
    Location,
    /// An abstract concept or theme.
    Concept,
    /// A data structure or artifact.
    Item,
}

impl NodeType {
    /// Human-readable label for this node kind.
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Character => "Character",
            NodeType::Location => "Location",
            NodeType::Concept => "Concept",
            NodeType::Item => "Item",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A node in the conceptual graph.
///
/// Node ids are human-readable strings and double as display labels.
/// Layout coordinates are intentionally absent - positioning belongs to the
/// external force-directed renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub node_type: NodeType,
    pub description: String,
}

impl GraphNode {
    /// Create a new node.
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type,
            description: description.into(),
        }
    }
}

/// A directed, labeled relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Relationship label, e.g. "governs" or "bridges".
    pub relationship: String,
}

impl GraphLink {
    /// Create a new link.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
        }
    }

    /// Check whether either endpoint is the given node.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
