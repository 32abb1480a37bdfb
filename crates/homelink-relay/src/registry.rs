//! Single-slot registry for the active controller connection.

use crate::{RelayError, RelayResult};
use std::fmt;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity of one accepted controller channel.
pub type ConnectionId = Uuid;

/// Sending half of a controller channel.
///
/// Outgoing text is queued for the connection's writer task; the handle
/// never waits for the controller to act on it.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<String>,
}

impl ConnectionHandle {
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue `text` for the controller. Fails once the writer has stopped.
    pub async fn send(&self, text: String) -> RelayResult<()> {
        self.sender
            .send(text)
            .await
            .map_err(|_| RelayError::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Holds at most one controller connection.
///
/// A new registration replaces the current one unconditionally. Clearing is
/// keyed by connection id, so a superseded channel shutting down late cannot
/// remove its replacement.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    slot: Mutex<Option<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handle` as the active connection, returning the one it replaced.
    pub async fn register(&self, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let id = handle.id();
        let previous = self.slot.lock().await.replace(handle);
        match &previous {
            Some(old) => info!(
                connection_id = %id,
                replaced = %old.id(),
                "Controller registered, replacing previous connection"
            ),
            None => info!(connection_id = %id, "Controller registered"),
        }
        previous
    }

    /// The active connection, if any.
    pub async fn current(&self) -> Option<ConnectionHandle> {
        self.slot.lock().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Remove the connection `id` if it is still the active one.
    ///
    /// Returns whether the slot was cleared.
    pub async fn clear(&self, id: ConnectionId) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(current) if current.id() == id => {
                *slot = None;
                info!(connection_id = %id, "Controller deregistered");
                true
            }
            Some(current) => {
                debug!(
                    connection_id = %id,
                    active = %current.id(),
                    "Ignoring clear from superseded connection"
                );
                false
            }
            None => false,
        }
    }

    /// Send `text` to the active controller.
    ///
    /// Fire-and-forget: success means the text was queued, not applied. A
    /// stale connection is deregistered and reported as `ChannelClosed`.
    pub async fn send(&self, text: String) -> RelayResult<ConnectionId> {
        let handle = self.current().await.ok_or(RelayError::NotConnected)?;
        let id = handle.id();

        match handle.send(text).await {
            Ok(()) => Ok(id),
            Err(e) => {
                warn!(connection_id = %id, "Send to controller failed, deregistering");
                self.clear(id).await;
                Err(e)
            }
        }
    }
}
