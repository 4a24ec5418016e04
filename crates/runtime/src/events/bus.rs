//! Broadcast fan-out for runtime events.

use tokio::sync::broadcast;

use super::RuntimeEvent;

/// Cloneable broadcast sender shared by the worker and every handle.
///
/// Publishing never blocks; receivers that fall behind observe
/// [`broadcast::error::RecvError::Lagged`].
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<RuntimeEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: RuntimeEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "battle_runtime::events", "no subscribers for runtime event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}
