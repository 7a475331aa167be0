//! Broadcast-backed session listener.

use tokio::sync::broadcast;

use crate::ports::{SessionEvent, SessionListener};

/// Fans session events out to any number of subscribers.
///
/// Events sent while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Creates a channel that buffers up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}

impl SessionListener for SessionEvents {
    fn notify(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!(?event, "No session subscribers");
        }
    }
}
