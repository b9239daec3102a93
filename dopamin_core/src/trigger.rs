//! Trigger log definitions - the interaction events the engine ingests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for trigger log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    /// Create a new random trigger ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of interaction event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    TaskAssignment,
    ProgressUpdate,
    TaskCompletion,
    ErrorReport,
    Feedback,
    SocialSignal,
    SystemDrift,
}

/// A single interaction event, immutable once ingested.
///
/// The log is append-only: entries are never mutated, removed, or compacted.
/// The full history is kept for audit purposes even though the calculator
/// only ever reads the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerLog {
    /// Assigned by the engine at ingestion time.
    pub id: TriggerId,

    /// Ingestion time, assigned by the engine - never caller-supplied.
    pub timestamp: DateTime<Utc>,

    /// Originating agent. Free-form; not validated against the roster.
    pub agent_id: String,

    pub event_type: EventType,

    /// Free text; carries no meaning for the calculator.
    pub description: String,

    /// Signed prediction-error magnitude for this event.
    pub dopamine_delta: f32,

    /// Caller-estimated novelty/quality in [0, 1]. Finite values are a
    /// precondition; the calculator clamps derived results, not inputs.
    pub intrinsic_score: f32,

    /// Marks events carrying interpersonal reciprocity signal.
    pub social_tag: bool,

    /// Opaque correlation handle, unused by calculations.
    pub context_hash: Option<String>,
}

/// Caller-supplied portion of a trigger log: everything except `id` and
/// `timestamp`.
///
/// No validation is performed here - out-of-range deltas, unknown agent ids,
/// and empty descriptions are accepted as-is. Derived metrics are clamped
/// during recomputation instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerLogInput {
    pub agent_id: String,
    pub event_type: EventType,
    pub description: String,
    pub dopamine_delta: f32,
    pub intrinsic_score: f32,
    pub social_tag: bool,
    pub context_hash: Option<String>,
}

impl TriggerLogInput {
    /// Create a new event for the given agent and kind.
    pub fn new(agent_id: impl Into<String>, event_type: EventType) -> Self {
        Self {
            agent_id: agent_id.into(),
            event_type,
            description: String::new(),
            dopamine_delta: 0.0,
            intrinsic_score: 0.0,
            social_tag: false,
            context_hash: None,
        }
    }

    /// Set the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the signed prediction-error magnitude.
    pub fn with_dopamine_delta(mut self, delta: f32) -> Self {
        self.dopamine_delta = delta;
        self
    }

    /// Set the novelty/quality estimate.
    pub fn with_intrinsic_score(mut self, score: f32) -> Self {
        self.intrinsic_score = score;
        self
    }

    /// Mark this event as carrying social signal.
    pub fn with_social_tag(mut self, social: bool) -> Self {
        self.social_tag = social;
        self
    }

    /// Attach an opaque correlation handle.
    pub fn with_context_hash(mut self, hash: impl Into<String>) -> Self {
        self.context_hash = Some(hash.into());
        self
    }

    /// Assign a fresh id and ingestion timestamp, producing the immutable
    /// log entry.
    pub fn stamp(self) -> TriggerLog {
        TriggerLog {
            id: TriggerId::new(),
            timestamp: Utc::now(),
            agent_id: self.agent_id,
            event_type: self.event_type,
            description: self.description,
            dopamine_delta: self.dopamine_delta,
            intrinsic_score: self.intrinsic_score,
            social_tag: self.social_tag,
            context_hash: self.context_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults() {
        let input = TriggerLogInput::new("a1", EventType::Feedback);
        assert_eq!(input.agent_id, "a1");
        assert_eq!(input.dopamine_delta, 0.0);
        assert_eq!(input.intrinsic_score, 0.0);
        assert!(!input.social_tag);
        assert!(input.context_hash.is_none());
    }

    #[test]
    fn test_input_builder() {
        let input = TriggerLogInput::new("critic", EventType::ErrorReport)
            .with_description("verification failed")
            .with_dopamine_delta(-0.4)
            .with_intrinsic_score(0.2)
            .with_social_tag(true)
            .with_context_hash("trace-77");

        assert_eq!(input.description, "verification failed");
        assert_eq!(input.dopamine_delta, -0.4);
        assert_eq!(input.intrinsic_score, 0.2);
        assert!(input.social_tag);
        assert_eq!(input.context_hash.as_deref(), Some("trace-77"));
    }

    #[test]
    fn test_input_is_not_validated() {
        // Out-of-range scores and deltas pass through untouched.
        let input = TriggerLogInput::new("rogue", EventType::SystemDrift)
            .with_dopamine_delta(-250.0)
            .with_intrinsic_score(7.5);

        assert_eq!(input.dopamine_delta, -250.0);
        assert_eq!(input.intrinsic_score, 7.5);
    }

    #[test]
    fn test_stamp_preserves_fields() {
        let log = TriggerLogInput::new("a1", EventType::TaskCompletion)
            .with_description("done")
            .with_dopamine_delta(0.8)
            .stamp();

        assert_eq!(log.agent_id, "a1");
        assert_eq!(log.event_type, EventType::TaskCompletion);
        assert_eq!(log.description, "done");
        assert_eq!(log.dopamine_delta, 0.8);
    }

    #[test]
    fn test_stamp_assigns_unique_ids() {
        let a = TriggerLogInput::new("a1", EventType::Feedback).stamp();
        let b = TriggerLogInput::new("a1", EventType::Feedback).stamp();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_event_type_wire_names() {
        let json = serde_json::to_string(&EventType::ErrorReport).unwrap();
        assert_eq!(json, "\"ERROR_REPORT\"");

        let back: EventType = serde_json::from_str("\"TASK_ASSIGNMENT\"").unwrap();
        assert_eq!(back, EventType::TaskAssignment);
    }
}
