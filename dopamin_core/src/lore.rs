//! Lore expansion - the seam to an external generative-text provider.
//!
//! The engine never depends on this seam: a failing provider degrades to a
//! human-readable fallback string instead of propagating an error into the
//! caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use concept_graph::GraphNode;

/// Shown when the provider reports a missing or invalid configuration.
pub const FALLBACK_CONFIG: &str = "API Key is missing. Please configure the environment.";

/// Shown when the provider fails to reach its backend.
pub const FALLBACK_NETWORK: &str = "Kernel connection severed. Check API configuration.";

/// Shown when the provider returns an empty response.
pub const FALLBACK_EMPTY: &str = "System latency detected. Re-calibrating inference engine.";

/// Failures a lore provider can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoreError {
    /// The provider could not reach its backend.
    #[error("network failure: {0}")]
    Network(String),

    /// The provider is missing configuration (e.g. credentials).
    #[error("configuration error: {0}")]
    Config(String),
}

/// External generative-text collaborator.
///
/// Implementations wrap whatever backend produces the lore text; the core
/// only sees this interface.
pub trait LoreProvider {
    /// Produce an expansion for the focused node given a user question and
    /// the ids of the surrounding network context.
    fn generate(
        &self,
        node: &GraphNode,
        question: &str,
        context_ids: &[&str],
    ) -> Result<String, LoreError>;
}

/// Assemble the kernel prompt for a lore request.
///
/// Pure and deterministic; providers pass this text to their backend.
pub fn lore_prompt(node: &GraphNode, question: &str, context_ids: &[&str]) -> String {
    format!(
        "You are the \"System Kernel\" of a futuristic Neuro-Symbolic AI Framework.\n\
         \n\
         Current Focus Node: {id} ({kind}) - {description}\n\
         Network Context: This component operates alongside: {context}.\n\
         \n\
         User Query: {question}\n\
         \n\
         Task: Provide a highly technical, analytical, yet visionary explanation (max 150 words). \
         Discuss how this component contributes to \"Meta-Orchestrated Collaboration.\"\n\
         Use terminology like \"high-dimensional manifold,\" \"symbolic grounding,\" \
         \"recursive reasoning,\" and \"entropy reduction.\"\n\
         Maintain a sophisticated, academic, and slightly cybernetic tone.",
        id = node.id,
        kind = node.node_type,
        description = node.description,
        context = context_ids.join(", "),
        question = question,
    )
}

/// Request an expansion, degrading to a fallback string on any failure.
///
/// This is the only call sites should use: it never returns an error and
/// never panics on provider misbehavior.
pub fn expand_lore<P: LoreProvider + ?Sized>(
    provider: &P,
    node: &GraphNode,
    question: &str,
    context_ids: &[&str],
) -> String {
    match provider.generate(node, question, context_ids) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_EMPTY.to_string(),
        Err(LoreError::Config(reason)) => {
            warn!(node = %node.id, reason = %reason, "lore provider misconfigured");
            FALLBACK_CONFIG.to_string()
        }
        Err(LoreError::Network(reason)) => {
            warn!(node = %node.id, reason = %reason, "lore provider unreachable");
            FALLBACK_NETWORK.to_string()
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One entry in a lore conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// A lore conversation focused on a single node.
///
/// Opens with the kernel greeting; each question appends the user message
/// and the (fail-open) model reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoreSession {
    node: GraphNode,
    messages: Vec<ChatMessage>,
}

impl LoreSession {
    /// Start a session for the given focus node.
    pub fn open(node: GraphNode) -> Self {
        let greeting = format!(
            "System Kernel initialized. Analyzing component: {}. \
             Awaiting query regarding architectural function.",
            node.id
        );
        Self {
            node,
            messages: vec![ChatMessage::model(greeting)],
        }
    }

    /// The focused node.
    pub fn node(&self) -> &GraphNode {
        &self.node
    }

    /// The transcript so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Ask a question about the focused node and record both sides of the
    /// exchange. Returns the model reply.
    pub fn ask<P: LoreProvider + ?Sized>(
        &mut self,
        provider: &P,
        question: &str,
        context_ids: &[&str],
    ) -> &str {
        self.messages.push(ChatMessage::user(question));

        let reply = expand_lore(provider, &self.node, question, context_ids);
        self.messages.push(ChatMessage::model(reply));

        &self.messages[self.messages.len() - 1].content
    }
}
