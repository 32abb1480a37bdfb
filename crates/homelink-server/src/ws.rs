//! Controller WebSocket endpoint.

use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use homelink_relay::{ChannelExit, InboundFrame};
use tracing::{debug, info};

pub async fn controller_socket(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_controller(state, socket))
}

async fn run_controller(state: AppState, socket: WebSocket) {
    info!("Controller channel accepted");
    let (sink, stream) = socket.split();

    let inbound = stream.map(|frame| frame.map(to_inbound));
    let outbound = Box::pin(sink.with(|text: String| async move {
        Ok::<_, axum::Error>(Message::Text(text.into()))
    }));

    if let ChannelExit::Error(e) = state.channel.run(inbound, outbound).await {
        debug!(error = %e, "Controller channel ended with error");
    }
}

fn to_inbound(message: Message) -> InboundFrame {
    match message {
        Message::Text(text) => InboundFrame::Text(text.as_str().to_owned()),
        Message::Close(_) => InboundFrame::Close,
        Message::Binary(data) => {
            debug!(len = data.len(), "Ignoring binary frame from controller");
            InboundFrame::Other
        }
        Message::Ping(_) | Message::Pong(_) => InboundFrame::Other,
    }
}
