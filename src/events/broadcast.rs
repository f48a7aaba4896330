//! Bridge from the synchronous bus to `tokio::sync::broadcast` receivers

use super::bus::EntityEventListener;
use super::types::{EntitySaveEvent, Propagation, SaveEventRecord};
use anyhow::Result;
use tokio::sync::broadcast;
use tracing::trace;

/// Default broadcast channel capacity
pub const DEFAULT_CAPACITY: usize = 1024;

/// Listener that forwards a [`SaveEventRecord`] of every event it receives
/// to a broadcast channel.
///
/// Sending never blocks the save. If no receivers are connected the record
/// is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastListener {
    sender: broadcast::Sender<SaveEventRecord>,
}

impl BroadcastListener {
    /// Create a listener; a zero capacity is raised to 1
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to receive records
    pub fn subscribe(&self) -> broadcast::Receiver<SaveEventRecord> {
        self.sender.subscribe()
    }

    /// Number of active receivers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastListener {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EntityEventListener for BroadcastListener {
    fn handle(&self, event: &EntitySaveEvent<'_>) -> Result<Propagation> {
        if let Ok(n) = self.sender.send(event.to_record()) {
            trace!(event = %event.name(), receivers = n, "Save event forwarded");
        }
        Ok(Propagation::Continue)
    }
}
