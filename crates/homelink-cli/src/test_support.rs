//! In-process control API for client tests.

use crate::client::ApiClient;
use homelink_server::AppState;
use homelink_store::{DeviceStateStore, MemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve a fresh in-memory API on an ephemeral port.
///
/// The returned state shares its registry with the server, so tests can
/// attach a controller handle directly.
pub async fn spawn_server() -> (ApiClient, AppState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(DeviceStateStore::new(Arc::new(MemoryStore::new())));
    tokio::spawn(homelink_server::serve(
        listener,
        state.clone(),
        std::future::pending(),
    ));
    let client = ApiClient::new(&format!("http://{addr}/api/v1/"));
    (client, state)
}
