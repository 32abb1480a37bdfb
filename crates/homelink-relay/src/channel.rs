//! Per-connection controller loop.
//!
//! Disconnected -> Connected on accept (register), Connected -> Disconnected
//! on close, receive error, write error or replacement (clear). While
//! connected every text frame is decoded and, if it fits the device model,
//! written to the store.

use crate::protocol::decode;
use crate::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use homelink_store::DeviceStateStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Queue depth between command senders and the socket writer.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// Transport-neutral view of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    /// Peer asked to close.
    Close,
    /// Pings, pongs, binary: nothing to apply.
    Other,
}

/// Why a connection loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelExit {
    /// Close frame or end of stream.
    Closed,
    /// A newer connection took the registry slot.
    Replaced,
    /// Receive or write failed.
    Error(String),
}

/// Runs controller connections against a shared registry and store.
#[derive(Clone)]
pub struct ChannelHandler {
    registry: Arc<ConnectionRegistry>,
    store: DeviceStateStore,
    outbound_capacity: usize,
}

impl ChannelHandler {
    pub fn new(registry: Arc<ConnectionRegistry>, store: DeviceStateStore) -> Self {
        Self {
            registry,
            store,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }

    /// Drive one accepted connection until it disconnects.
    ///
    /// Registers the connection (replacing any other), spawns a writer that
    /// drains queued commands into `outbound`, applies inbound reports, and
    /// deregisters on exit unless a newer connection has taken over.
    ///
    /// The writer ends when the registry drops this connection's queue or a
    /// write fails; either way the loop stops too, so a superseded
    /// connection never touches the store again.
    pub async fn run<I, E, O>(&self, mut inbound: I, outbound: O) -> ChannelExit
    where
        I: Stream<Item = Result<InboundFrame, E>> + Unpin,
        E: fmt::Display,
        O: Sink<String> + Unpin + Send + 'static,
        O::Error: fmt::Display,
    {
        let (tx, rx) = mpsc::channel::<String>(self.outbound_capacity);
        let handle = ConnectionHandle::new(tx);
        let id = handle.id();

        let mut writer = tokio::spawn(write_outbound(id, rx, outbound));
        self.registry.register(handle).await;

        let exit = loop {
            tokio::select! {
                frame = inbound.next() => match frame {
                    Some(Ok(InboundFrame::Text(text))) => self.apply_message(id, &text).await,
                    Some(Ok(InboundFrame::Other)) => {}
                    Some(Ok(InboundFrame::Close)) | None => break ChannelExit::Closed,
                    Some(Err(e)) => break ChannelExit::Error(e.to_string()),
                },
                finished = &mut writer => break match finished {
                    Ok(Ok(())) => ChannelExit::Replaced,
                    Ok(Err(e)) => ChannelExit::Error(e),
                    Err(e) => ChannelExit::Error(e.to_string()),
                },
            }
        };

        writer.abort();
        self.registry.clear(id).await;

        match &exit {
            ChannelExit::Closed => info!(connection_id = %id, "Controller disconnected"),
            ChannelExit::Replaced => {
                info!(connection_id = %id, "Controller superseded, closing channel")
            }
            ChannelExit::Error(e) => {
                warn!(connection_id = %id, error = %e, "Controller connection failed")
            }
        }
        exit
    }

    /// Apply one inbound text message to the store. Malformed or unsupported
    /// messages are logged and dropped.
    pub async fn apply_message(&self, id: ConnectionId, text: &str) {
        debug!(connection_id = %id, message = %text, "Received from controller");

        let update = match decode(text).and_then(|update| update.resolve()) {
            Ok(update) => update,
            Err(e) => {
                warn!(connection_id = %id, error = %e, "Ignoring controller message");
                return;
            }
        };

        self.store.set(&update.key, &update.value).await;
    }
}

/// Forward queued commands to the transport.
///
/// Returns `Ok` once every sender is gone (the registry let go of this
/// connection) and the write error otherwise.
async fn write_outbound<O>(
    id: ConnectionId,
    mut rx: mpsc::Receiver<String>,
    mut outbound: O,
) -> Result<(), String>
where
    O: Sink<String> + Unpin,
    O::Error: fmt::Display,
{
    while let Some(text) = rx.recv().await {
        debug!(connection_id = %id, command = %text, "Sending to controller");
        if let Err(e) = outbound.send(text).await {
            warn!(connection_id = %id, error = %e, "Controller write failed");
            return Err(e.to_string());
        }
    }
    Ok(())
}
