//! Shared server state.

use homelink_control::DeviceController;
use homelink_relay::{ChannelHandler, ConnectionRegistry};
use homelink_store::DeviceStateStore;
use std::sync::Arc;

/// Handles shared by every request.
///
/// The controller and the channel handler see the same registry, so a
/// controller connecting on `/ws` is immediately visible to API calls.
#[derive(Clone)]
pub struct AppState {
    pub controller: DeviceController,
    pub channel: ChannelHandler,
}

impl AppState {
    pub fn new(store: DeviceStateStore) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            controller: DeviceController::new(store.clone(), registry.clone()),
            channel: ChannelHandler::new(registry, store),
        }
    }
}
