//! Controller channel for Homelink.
//!
//! This crate provides:
//! - The text command codec (`device:property:value`)
//! - A single-slot registry holding the active controller connection
//! - The per-connection receive loop that applies controller reports
//!
//! It is transport-agnostic: the server adapts its WebSocket into a stream of
//! [`InboundFrame`]s and a sink of outgoing text.

mod channel;
mod error;
mod protocol;
mod registry;

pub use channel::{ChannelExit, ChannelHandler, InboundFrame, DEFAULT_OUTBOUND_CAPACITY};
pub use error::{RelayError, RelayResult};
pub use protocol::{decode, encode, format_delta, Command, InboundUpdate, StateUpdate};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
