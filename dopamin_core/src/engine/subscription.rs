//! Listener registry for the engine's synchronous notification contract.

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;
use uuid::Uuid;

use crate::engine::EngineState;

/// Unique identifier for subscribed listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    /// Create a new random listener ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a listener wants to happen after a notification.
///
/// Returning [`ListenerAction::Unsubscribe`] removes the listener from
/// inside the notification loop; it will not be invoked on subsequent
/// events. This is how a callback drops itself, since it cannot re-enter
/// the engine mid-notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerAction {
    #[default]
    Keep,
    Unsubscribe,
}

pub(crate) type BoxedListener = Box<dyn FnMut(&EngineState) -> ListenerAction>;

/// Ordered listener registry. Notification order is insertion order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<(ListenerId, BoxedListener)>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, listener: BoxedListener) -> ListenerId {
        let id = ListenerId::new();
        self.entries.push((id, listener));
        id
    }

    /// Remove exactly the listener with the given id. Returns whether it
    /// was present; removing twice is a no-op.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke every listener in insertion order with the given snapshot.
    ///
    /// Each invocation is isolated: a panicking listener is contained,
    /// logged, and removed, and the remaining listeners still run. Engine
    /// state is untouched by listener failures.
    pub(crate) fn notify_all(&mut self, state: &EngineState) {
        self.entries.retain_mut(|(id, listener)| {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(state))) {
                Ok(ListenerAction::Keep) => true,
                Ok(ListenerAction::Unsubscribe) => false,
                Err(_) => {
                    warn!(listener = %id, "listener panicked during notification; removing it");
                    false
                }
            }
        });
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_listener(counter: &Rc<Cell<u32>>) -> BoxedListener {
        let counter = Rc::clone(counter);
        Box::new(move |_| {
            counter.set(counter.get() + 1);
            ListenerAction::Keep
        })
    }

    #[test]
    fn test_insert_and_remove() {
        let mut registry = ListenerRegistry::new();
        let id = registry.insert(Box::new(|_| ListenerAction::Keep));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(id));
        assert_eq!(registry.len(), 0);

        // Second removal is a safe no-op.
        assert!(!registry.remove(id));
    }

    #[test]
    fn test_notification_order_is_insertion_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            registry.insert(Box::new(move |_| {
                order.borrow_mut().push(tag);
                ListenerAction::Keep
            }));
        }

        registry.notify_all(&EngineState::new());
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_self_unsubscribe_during_notification() {
        let counter = Rc::new(Cell::new(0u32));
        let mut registry = ListenerRegistry::new();

        let once = Rc::clone(&counter);
        registry.insert(Box::new(move |_| {
            once.set(once.get() + 1);
            ListenerAction::Unsubscribe
        }));
        let after = Rc::new(Cell::new(0u32));
        registry.insert(counting_listener(&after));

        let state = EngineState::new();
        registry.notify_all(&state);
        registry.notify_all(&state);

        // The one-shot listener ran once; the listener behind it was never
        // skipped.
        assert_eq!(counter.get(), 1);
        assert_eq!(after.get(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let before = Rc::new(Cell::new(0u32));
        let after = Rc::new(Cell::new(0u32));
        let mut registry = ListenerRegistry::new();

        registry.insert(counting_listener(&before));
        registry.insert(Box::new(|_| panic!("listener bug")));
        registry.insert(counting_listener(&after));

        let state = EngineState::new();
        registry.notify_all(&state);

        assert_eq!(before.get(), 1);
        assert_eq!(after.get(), 1);

        // The panicking listener was removed; the next round is clean.
        assert_eq!(registry.len(), 2);
        registry.notify_all(&state);
        assert_eq!(before.get(), 2);
        assert_eq!(after.get(), 2);
    }
}
