//! Per-event serialization

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per event id
///
/// Holding an event's guard serializes mutate, snapshot, recompute and
/// write for that event. Different events never contend. Entries nobody
/// holds or waits on are pruned on the next acquire.
#[derive(Debug, Default)]
pub struct EventLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an event
    pub async fn acquire(&self, event_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(event_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of events currently tracked
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
