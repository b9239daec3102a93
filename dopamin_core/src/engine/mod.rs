//! The Dopamin engine - engine state and the service object that owns it.

mod subscription;

pub use subscription::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::agent::{AgentState, AgentStatus};
use crate::metrics::{self, DopamineMetrics};
use crate::trigger::{TriggerLog, TriggerLogInput};

/// The aggregate engine state broadcast to subscribers.
///
/// Owned exclusively by the engine; consumers only ever receive `&EngineState`
/// snapshots and cannot mutate through them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineState {
    /// Current derived signals.
    pub metrics: DopamineMetrics,

    /// Append-only event history. Never trimmed or compacted; the full log
    /// is kept for audit even though only the trailing window feeds the
    /// calculator.
    pub logs: Vec<TriggerLog>,

    /// Tracked agents, keyed by id.
    pub agents: HashMap<String, AgentState>,

    /// Whether the latest recompute landed in the flow band.
    pub is_flow_state: bool,
}

impl EngineState {
    /// Create the fixed startup state: baseline metrics, empty log, empty
    /// roster, flow flag set.
    pub fn new() -> Self {
        Self {
            metrics: DopamineMetrics::baseline(),
            logs: Vec::new(),
            agents: HashMap::new(),
            is_flow_state: true,
        }
    }

    /// Total number of ingested events.
    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    /// The `n` most recent log entries, oldest first.
    pub fn recent_logs(&self, n: usize) -> &[TriggerLog] {
        &self.logs[self.logs.len().saturating_sub(n)..]
    }

    /// Look up a tracked agent by id.
    pub fn agent(&self, id: &str) -> Option<&AgentState> {
        self.agents.get(id)
    }

    /// Number of tracked agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// The engagement engine service.
///
/// An explicit, constructible object: the application entry point owns one
/// instance and passes it by reference to consumers. Every mutating call
/// runs to completion - ingestion, recomputation, and notification are one
/// uninterrupted sequence - so subscribers never observe metrics
/// inconsistent with the log that produced them. In a multi-threaded host
/// the whole object must sit behind a mutex for the same reason.
pub struct DopaminEngine {
    state: EngineState,
    listeners: ListenerRegistry,
}

impl DopaminEngine {
    /// Create a new engine at the startup baseline.
    pub fn new() -> Self {
        Self {
            state: EngineState::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Current state snapshot, read-only.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Ingest an interaction event.
    ///
    /// Assigns a fresh id and the current time, appends to the log,
    /// recomputes the metrics tuple from the trailing window, then notifies
    /// subscribers. Malformed input is accepted as-is; derived metrics are
    /// clamped during recomputation. Infallible.
    pub fn log_event(&mut self, input: TriggerLogInput) {
        let log = input.stamp();
        debug!(
            trigger = %log.id,
            agent_id = %log.agent_id,
            event_type = ?log.event_type,
            "trigger ingested"
        );

        self.state.logs.push(log);

        if let Some(update) = metrics::recompute(&self.state.logs, &self.state.metrics) {
            self.state.metrics = update.metrics;
            self.state.is_flow_state = update.is_flow;
            debug!(
                dopamin_dichte = self.state.metrics.dopamin_dichte,
                engagement_index = self.state.metrics.engagement_index,
                is_flow = update.is_flow,
                "metrics recomputed"
            );
        }

        self.notify();
    }

    /// Add an agent to the roster.
    ///
    /// Idempotent: re-registering an existing id is a no-op and does not
    /// notify.
    pub fn register_agent(&mut self, agent: AgentState) {
        if self.state.agents.contains_key(&agent.id) {
            return;
        }

        debug!(agent_id = %agent.id, "agent registered");
        self.state.agents.insert(agent.id.clone(), agent);
        self.notify();
    }

    /// Update a tracked agent's status and, when supplied, its current task.
    ///
    /// Unknown ids are silently ignored (no state change, no notification).
    pub fn update_agent_status(&mut self, id: &str, status: AgentStatus, task: Option<&str>) {
        if let Some(agent) = self.state.agents.get_mut(id) {
            agent.status = status;
            if let Some(task) = task {
                agent.current_task = Some(task.to_string());
            }
            self.notify();
        } else {
            debug!(agent_id = id, "status update for unknown agent ignored");
        }
    }

    /// Subscribe a listener to state changes.
    ///
    /// Listeners are notified synchronously after every state change, in
    /// insertion order. The returned id feeds [`DopaminEngine::unsubscribe`];
    /// a listener can also drop itself by returning
    /// [`ListenerAction::Unsubscribe`] from a notification.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&EngineState) -> ListenerAction + 'static,
    ) -> ListenerId {
        self.listeners.insert(Box::new(listener))
    }

    /// Remove a previously subscribed listener.
    ///
    /// Returns whether the listener was present; calling twice with the
    /// same id is a safe no-op.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of currently subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let state = &self.state;
        self.listeners.notify_all(state);
    }
}

impl Default for DopaminEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DopaminEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DopaminEngine")
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::EventType;
    use std::cell::Cell;
    use std::rc::Rc;

    fn feedback(delta: f32, intrinsic: f32) -> TriggerLogInput {
        TriggerLogInput::new("a1", EventType::Feedback)
            .with_description("x")
            .with_dopamine_delta(delta)
            .with_intrinsic_score(intrinsic)
    }

    #[test]
    fn test_engine_starts_at_baseline() {
        let engine = DopaminEngine::new();
        let state = engine.state();

        assert_eq!(state.metrics, DopamineMetrics::baseline());
        assert!(state.is_flow_state);
        assert_eq!(state.log_count(), 0);
        assert_eq!(state.agent_count(), 0);
    }

    #[test]
    fn test_first_event_scenario() {
        let mut engine = DopaminEngine::new();
        engine.log_event(feedback(1.0, 1.0));

        let state = engine.state();
        assert!((state.metrics.dopamin_dichte - 0.55).abs() < 1e-4);
        assert!(state.is_flow_state);
        assert_eq!(state.metrics.flow_zeit, 1);
    }

    #[test]
    fn test_log_grows_by_exactly_one() {
        let mut engine = DopaminEngine::new();
        for i in 0..25 {
            engine.log_event(feedback(0.1, 0.0));
            assert_eq!(engine.state().log_count(), i + 1);
        }
    }

    #[test]
    fn test_event_assigned_id_and_timestamp() {
        let mut engine = DopaminEngine::new();
        engine.log_event(feedback(0.0, 0.0));
        engine.log_event(feedback(0.0, 0.0));

        let logs = &engine.state().logs;
        assert_ne!(logs[0].id, logs[1].id);
        assert!(logs[0].timestamp <= logs[1].timestamp);
    }

    #[test]
    fn test_metrics_replaced_wholesale_per_event() {
        let mut engine = DopaminEngine::new();

        engine.log_event(feedback(8.0, 0.0));
        let after_first = engine.state().metrics;
        assert!((after_first.dopamin_dichte - 0.7).abs() < 1e-4);

        engine.log_event(feedback(-8.0, 0.0));
        let after_second = engine.state().metrics;
        assert!((after_second.dopamin_dichte - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_register_agent_idempotent() {
        let mut engine = DopaminEngine::new();
        let notifications = Rc::new(Cell::new(0u32));
        let n = Rc::clone(&notifications);
        engine.subscribe(move |_| {
            n.set(n.get() + 1);
            ListenerAction::Keep
        });

        engine.register_agent(AgentState::new("c1", "Critic", "evaluator"));
        engine.register_agent(AgentState::new("c1", "Critic Copy", "impostor"));

        assert_eq!(engine.state().agent_count(), 1);
        assert_eq!(engine.state().agent("c1").unwrap().name, "Critic");
        assert_eq!(notifications.get(), 1);
    }

    #[test]
    fn test_update_agent_status() {
        let mut engine = DopaminEngine::new();
        engine.register_agent(AgentState::new("c1", "Critic", "evaluator"));

        engine.update_agent_status("c1", AgentStatus::Working, Some("audit trace"));

        let agent = engine.state().agent("c1").unwrap();
        assert_eq!(agent.status, AgentStatus::Working);
        assert_eq!(agent.current_task.as_deref(), Some("audit trace"));
    }

    #[test]
    fn test_update_without_task_keeps_previous_task() {
        let mut engine = DopaminEngine::new();
        engine.register_agent(AgentState::new("c1", "Critic", "evaluator").with_task("audit"));

        engine.update_agent_status("c1", AgentStatus::Waiting, None);

        let agent = engine.state().agent("c1").unwrap();
        assert_eq!(agent.status, AgentStatus::Waiting);
        assert_eq!(agent.current_task.as_deref(), Some("audit"));
    }

    #[test]
    fn test_update_unknown_agent_is_silent() {
        let mut engine = DopaminEngine::new();
        engine.register_agent(AgentState::new("c1", "Critic", "evaluator"));

        let notifications = Rc::new(Cell::new(0u32));
        let n = Rc::clone(&notifications);
        engine.subscribe(move |_| {
            n.set(n.get() + 1);
            ListenerAction::Keep
        });

        engine.update_agent_status("ghost", AgentStatus::Working, Some("haunt"));

        assert_eq!(engine.state().agent_count(), 1);
        assert_eq!(engine.state().agent("c1").unwrap().status, AgentStatus::Idle);
        assert_eq!(notifications.get(), 0);
    }

    #[test]
    fn test_subscriber_sees_consistent_snapshot() {
        let mut engine = DopaminEngine::new();
        let observed = Rc::new(Cell::new((0usize, 0.0f32)));
        let o = Rc::clone(&observed);
        engine.subscribe(move |state| {
            o.set((state.log_count(), state.metrics.dopamin_dichte));
            ListenerAction::Keep
        });

        engine.log_event(feedback(1.0, 1.0));

        let (log_count, dichte) = observed.get();
        assert_eq!(log_count, 1);
        assert!((dichte - 0.55).abs() < 1e-4);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut engine = DopaminEngine::new();
        let notifications = Rc::new(Cell::new(0u32));
        let n = Rc::clone(&notifications);
        let id = engine.subscribe(move |_| {
            n.set(n.get() + 1);
            ListenerAction::Keep
        });

        engine.log_event(feedback(0.0, 0.0));
        assert!(engine.unsubscribe(id));
        engine.log_event(feedback(0.0, 0.0));

        assert_eq!(notifications.get(), 1);
        // Unsubscribing again is a safe no-op.
        assert!(!engine.unsubscribe(id));
    }

    #[test]
    fn test_listener_self_unsubscribes_mid_sequence() {
        let mut engine = DopaminEngine::new();

        let one_shot = Rc::new(Cell::new(0u32));
        let o = Rc::clone(&one_shot);
        engine.subscribe(move |_| {
            o.set(o.get() + 1);
            ListenerAction::Unsubscribe
        });

        let steady = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&steady);
        engine.subscribe(move |_| {
            s.set(s.get() + 1);
            ListenerAction::Keep
        });

        engine.log_event(feedback(0.0, 0.0));
        engine.log_event(feedback(0.0, 0.0));

        assert_eq!(one_shot.get(), 1);
        assert_eq!(steady.get(), 2);
        assert_eq!(engine.listener_count(), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_corrupt_engine() {
        let mut engine = DopaminEngine::new();
        engine.subscribe(|_| panic!("subscriber bug"));

        let steady = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&steady);
        engine.subscribe(move |_| {
            s.set(s.get() + 1);
            ListenerAction::Keep
        });

        engine.log_event(feedback(1.0, 1.0));

        // The event was ingested and metrics recomputed despite the panic.
        assert_eq!(engine.state().log_count(), 1);
        assert!((engine.state().metrics.dopamin_dichte - 0.55).abs() < 1e-4);
        assert_eq!(steady.get(), 1);
        assert_eq!(engine.listener_count(), 1);
    }

    #[test]
    fn test_window_excludes_oldest_after_twenty_one_events() {
        let mut engine = DopaminEngine::new();

        // Extreme first event saturates density.
        engine.log_event(feedback(1000.0, 0.0));
        assert_eq!(engine.state().metrics.dopamin_dichte, 1.0);

        // Twenty neutral events push it out of the window.
        for _ in 0..20 {
            engine.log_event(feedback(0.0, 0.0));
        }

        assert_eq!(engine.state().log_count(), 21);
        assert!((engine.state().metrics.dopamin_dichte - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_state_serializes() {
        let mut engine = DopaminEngine::new();
        engine.register_agent(AgentState::new("c1", "Critic", "evaluator"));
        engine.log_event(feedback(0.5, 0.5).with_context_hash("ctx-1"));

        let json = serde_json::to_value(engine.state()).unwrap();
        assert_eq!(json["logs"][0]["event_type"], "FEEDBACK");
        assert_eq!(json["agents"]["c1"]["status"], "IDLE");
        assert!(json["is_flow_state"].as_bool().unwrap());
    }
}
