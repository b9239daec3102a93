//! The seeded catalog - the neuro-symbolic framework content shipped with
//! the application.

use crate::graph::GraphData;
use crate::node::{GraphLink, GraphNode, NodeType};

/// Build the seeded conceptual graph.
///
/// Content is fixture data: four orchestration agents, the spaces they
/// operate within, the data structures they exchange, and the concepts that
/// bind them.
pub fn seed_graph() -> GraphData {
    let mut graph = GraphData::new();

    // Agents
    graph.add_node(GraphNode::new(
        "Meta-Orchestrator",
        NodeType::Character,
        "The central executive agent responsible for task decomposition and agent dispatch.",
    ));
    graph.add_node(GraphNode::new(
        "Neural Pattern Matcher",
        NodeType::Character,
        "Deep learning model specialized in unstructured data perception and intuition.",
    ));
    graph.add_node(GraphNode::new(
        "Symbolic Reasoner",
        NodeType::Character,
        "Logic-based engine handling formal verification, arithmetic, and rule adherence.",
    ));
    graph.add_node(GraphNode::new(
        "Critic Agent",
        NodeType::Character,
        "Evaluates outputs for safety, alignment, and hallucination reduction.",
    ));

    // Layers and spaces
    graph.add_node(GraphNode::new(
        "Global Workspace",
        NodeType::Location,
        "Shared memory space where agents publish intermediate results and subscribe to goals.",
    ));
    graph.add_node(GraphNode::new(
        "Latent Space",
        NodeType::Location,
        "High-dimensional vector space representing continuous embeddings of concepts.",
    ));
    graph.add_node(GraphNode::new(
        "Symbolic Plane",
        NodeType::Location,
        "Discrete graph structure representing entities, relations, and logic rules.",
    ));
    graph.add_node(GraphNode::new(
        "Interaction Boundary",
        NodeType::Location,
        "The interface between the autonomous system and human collaborators.",
    ));

    // Data structures
    graph.add_node(GraphNode::new(
        "Knowledge Graph",
        NodeType::Item,
        "Structured repository of explicit facts and relationships.",
    ));
    graph.add_node(GraphNode::new(
        "Vector Embeddings",
        NodeType::Item,
        "Numerical representations capturing semantic similarity.",
    ));
    graph.add_node(GraphNode::new(
        "Inference Trace",
        NodeType::Item,
        "Step-by-step audit log of the reasoning path taken by the system.",
    ));
    graph.add_node(GraphNode::new(
        "Attention Map",
        NodeType::Item,
        "Visualization of focus weights across input modalities.",
    ));
    graph.add_node(GraphNode::new(
        "Reward Signal",
        NodeType::Item,
        "Feedback mechanism used to reinforce optimal collaboration strategies.",
    ));

    // Concepts
    graph.add_node(GraphNode::new(
        "Neuro-Symbolic Grounding",
        NodeType::Concept,
        "The process of anchoring abstract symbols to perceptual neural data.",
    ));
    graph.add_node(GraphNode::new(
        "Compositionality",
        NodeType::Concept,
        "The ability to understand and build complex ideas from simpler parts.",
    ));
    graph.add_node(GraphNode::new(
        "Active Inference",
        NodeType::Concept,
        "Minimizing surprise by acting upon the environment to verify predictions.",
    ));
    graph.add_node(GraphNode::new(
        "Semantic Alignment",
        NodeType::Concept,
        "Ensuring neural outputs match the intended symbolic meaning and safety constraints.",
    ));
    graph.add_node(GraphNode::new(
        "Federated Learning",
        NodeType::Concept,
        "Decentralized model training preserving privacy across agent nodes.",
    ));

    // Architecture
    graph.add_link(GraphLink::new("Meta-Orchestrator", "Global Workspace", "governs"));
    graph.add_link(GraphLink::new("Meta-Orchestrator", "Critic Agent", "invokes"));

    // Neural-symbolic bridge
    graph.add_link(GraphLink::new("Neural Pattern Matcher", "Latent Space", "operates_within"));
    graph.add_link(GraphLink::new("Symbolic Reasoner", "Symbolic Plane", "operates_within"));
    graph.add_link(GraphLink::new("Neuro-Symbolic Grounding", "Latent Space", "bridges"));
    graph.add_link(GraphLink::new("Neuro-Symbolic Grounding", "Symbolic Plane", "bridges"));

    // Data flow
    graph.add_link(GraphLink::new("Symbolic Reasoner", "Knowledge Graph", "queries"));
    graph.add_link(GraphLink::new("Neural Pattern Matcher", "Vector Embeddings", "generates"));
    graph.add_link(GraphLink::new("Vector Embeddings", "Knowledge Graph", "mapped_to"));

    // Process
    graph.add_link(GraphLink::new("Critic Agent", "Inference Trace", "audits"));
    graph.add_link(GraphLink::new("Critic Agent", "Reward Signal", "issues"));
    graph.add_link(GraphLink::new("Neural Pattern Matcher", "Attention Map", "utilizes"));

    // Conceptual links
    graph.add_link(GraphLink::new("Compositionality", "Symbolic Reasoner", "empowers"));
    graph.add_link(GraphLink::new("Active Inference", "Meta-Orchestrator", "guides"));
    graph.add_link(GraphLink::new("Semantic Alignment", "Interaction Boundary", "enforces"));
    graph.add_link(GraphLink::new("Federated Learning", "Global Workspace", "synchronizes"));

    graph
}
