//! DOM Events
//!
//! Per-instance listener registry. Listeners for one event type fire in
//! registration order; registering the same handler twice fires it twice.

use std::collections::HashMap;
use std::rc::Rc;

use crate::NodeId;

/// Event handler callback
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Handle returned by [`EventRegistry::on`], used to remove one listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    /// Element the event was dispatched on (NONE if not yet rendered)
    pub target: NodeId,
    pub detail: Option<String>,
}

impl Event {
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

struct Listener {
    id: ListenerId,
    handler: EventHandler,
}

/// Listener registry keyed by event type
#[derive(Default)]
pub struct EventRegistry {
    listeners: HashMap<String, Vec<Listener>>,
    next_id: u64,
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventRegistry").field("listeners", &counts).finish()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `event_type`
    pub fn on(&mut self, event_type: &str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Listener { id, handler });
        id
    }

    /// Remove one listener, or every listener of the type when `listener` is None.
    /// Returns the number of listeners removed.
    pub fn off(&mut self, event_type: &str, listener: Option<ListenerId>) -> usize {
        match listener {
            None => self.listeners.remove(event_type).map_or(0, |l| l.len()),
            Some(id) => {
                let Some(list) = self.listeners.get_mut(event_type) else {
                    return 0;
                };
                let before = list.len();
                list.retain(|l| l.id != id);
                let removed = before - list.len();
                if list.is_empty() {
                    self.listeners.remove(event_type);
                }
                removed
            }
        }
    }

    /// Snapshot of the handlers for a type, in registration order.
    ///
    /// Callers dispatch from the snapshot so handlers may register or remove
    /// listeners while the event is being delivered.
    pub fn handlers(&self, event_type: &str) -> Vec<EventHandler> {
        self.listeners
            .get(event_type)
            .map(|list| list.iter().map(|l| Rc::clone(&l.handler)).collect())
            .unwrap_or_default()
    }

    /// Deliver an event to every listener of its type. Returns the number notified.
    pub fn emit(&self, event: &Event) -> usize {
        let handlers = self.handlers(&event.event_type);
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners.get(event_type).map_or(0, Vec::len)
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
