use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::ConnectionNotice;

/// RealtimeChannel
///
/// The notification side-channel used after a connection request is accepted by the chat
/// backend. Emission is fire-and-forget: there is no acknowledgement, retry or ordering
/// contract, and a send must never block or fail the caller.
pub trait RealtimeChannel: Send + Sync {
    /// Emits the `send_request` event for `notice.receiver_id`.
    fn send_request(&self, notice: ConnectionNotice);
}

/// BroadcastChannel
///
/// In-process implementation over a tokio broadcast channel. Subscribers (e.g. a websocket
/// fan-out task) receive every notice emitted after they subscribed; with no subscribers the
/// notice is dropped.
#[derive(Clone)]
pub struct BroadcastChannel {
    sender: broadcast::Sender<ConnectionNotice>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionNotice> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

impl RealtimeChannel for BroadcastChannel {
    fn send_request(&self, notice: ConnectionNotice) {
        let receiver_id = notice.receiver_id.clone();
        match self.sender.send(notice) {
            Ok(listeners) => {
                tracing::debug!(receiver_id = %receiver_id, listeners, "send_request emitted")
            }
            Err(_) => tracing::debug!(receiver_id = %receiver_id, "send_request dropped: no listeners"),
        }
    }
}

/// RealtimeState
///
/// The shared handle stored in the application state.
pub type RealtimeState = Arc<dyn RealtimeChannel>;
