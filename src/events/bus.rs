//! Synchronous publish/subscribe bus keyed by event name

use super::types::{EntitySaveEvent, Propagation};
use anyhow::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Publishes a save event to the listeners registered under `event_name`.
///
/// Implementations invoke listeners on the caller's thread and return the
/// first listener error unchanged.
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: &EntitySaveEvent<'_>, event_name: &str) -> Result<()>;
}

/// Receives save events from an [`EventBus`]
pub trait EntityEventListener: Send + Sync {
    fn handle(&self, event: &EntitySaveEvent<'_>) -> Result<Propagation>;
}

/// Listener backed by a closure, see [`listener_fn`]
#[derive(Clone)]
pub struct FnListener<F> {
    f: F,
}

/// Wrap a closure as an [`EntityEventListener`]
pub fn listener_fn<F>(f: F) -> FnListener<F>
where
    F: Fn(&EntitySaveEvent<'_>) -> Result<Propagation> + Send + Sync,
{
    FnListener { f }
}

impl<F> EntityEventListener for FnListener<F>
where
    F: Fn(&EntitySaveEvent<'_>) -> Result<Propagation> + Send + Sync,
{
    fn handle(&self, event: &EntitySaveEvent<'_>) -> Result<Propagation> {
        (self.f)(event)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    priority: i32,
    listener: Arc<dyn EntityEventListener>,
}

/// In-process event bus.
///
/// Listeners run one after another on the dispatching thread, highest
/// priority first, equal priorities in registration order. Clones share the
/// same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<DashMap<String, Vec<Registration>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener with priority 0
    pub fn subscribe<L>(&self, event_name: &str, listener: L) -> ListenerId
    where
        L: EntityEventListener + 'static,
    {
        self.subscribe_with_priority(event_name, 0, listener)
    }

    /// Register a listener; higher priorities run earlier
    pub fn subscribe_with_priority<L>(
        &self,
        event_name: &str,
        priority: i32,
        listener: L,
    ) -> ListenerId
    where
        L: EntityEventListener + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.listeners.entry(event_name.to_string()).or_default();
        let at = entries.partition_point(|r| r.priority >= priority);
        entries.insert(
            at,
            Registration {
                id,
                priority,
                listener: Arc::new(listener),
            },
        );
        debug!(
            event = %event_name,
            priority,
            listeners = entries.len(),
            "Listener subscribed"
        );
        id
    }

    /// Remove a listener. Returns false if it was not registered under `event_name`.
    pub fn unsubscribe(&self, event_name: &str, id: ListenerId) -> bool {
        let removed = match self.listeners.get_mut(event_name) {
            Some(mut entries) => {
                let before = entries.len();
                entries.retain(|r| r.id != id);
                before != entries.len()
            }
            None => return false,
        };
        self.listeners
            .remove_if(event_name, |_, entries| entries.is_empty());
        removed
    }

    /// Number of listeners registered under `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners
            .get(event_name)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listener_count(event_name) > 0
    }

    // Registry guard is released before any listener runs, so listeners may
    // subscribe or unsubscribe re-entrantly.
    fn snapshot(&self, event_name: &str) -> Vec<Arc<dyn EntityEventListener>> {
        self.listeners
            .get(event_name)
            .map(|entries| entries.iter().map(|r| r.listener.clone()).collect())
            .unwrap_or_default()
    }
}

impl EventDispatcher for EventBus {
    fn dispatch(&self, event: &EntitySaveEvent<'_>, event_name: &str) -> Result<()> {
        let listeners = self.snapshot(event_name);
        debug!(
            event = %event_name,
            entity_type = %event.entity_type_id(),
            is_new = event.is_new(),
            listeners = listeners.len(),
            "Dispatching entity event"
        );

        for (position, listener) in listeners.iter().enumerate() {
            match listener.handle(event) {
                Ok(Propagation::Continue) => {}
                Ok(Propagation::Stop) => {
                    trace!(event = %event_name, position, "Propagation stopped");
                    break;
                }
                Err(e) => {
                    debug!(event = %event_name, position, error = %e, "Listener failed");
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}
