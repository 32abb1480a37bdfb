//! Homelink server: HTTP control API plus the controller WebSocket.
//!
//! Everything lives under `/api/v1`:
//! - `POST /{device}` and `GET /{device}/status` for power
//! - `POST|GET /{device}/volume` for TV and radio
//! - `GET /ws` for the controller channel
//! - `GET /health`

mod api;
mod error;
mod state;
mod ws;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Base path for every route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ws", get(ws::controller_socket))
        .route("/health", get(api::health))
        .route("/{device}", post(api::set_power))
        .route("/{device}/status", get(api::power_status))
        .route("/{device}/volume", get(api::volume).post(api::change_volume));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
