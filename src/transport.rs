//! `PeerChannelClient`: the trait boundary this crate expects from an
//! external peer-channel transport. No implementation ships here — the
//! transport is an external collaborator — but the trait has to exist so a
//! host's message/update callbacks type-check against something concrete.

use std::sync::mpsc::Receiver;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("peer-channel transport connection failed: {0}")]
    ConnectionFailed(String),

    #[error("peer-channel {channel_id} not found")]
    ChannelNotFound { channel_id: String },
}

pub type TransportResult<T> = Result<T, TransportError>;

/// A single inbound message as delivered by the transport, before any
/// envelope parsing: which channel it arrived on, its sequence number, and
/// the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel_id: String,
    pub sequence: u64,
    pub bytes: Vec<u8>,
}

/// The minimal interface the core expects from a peer-channel transport.
pub trait PeerChannelClient {
    /// Subscribes to inbound messages on the channel identified by `token`,
    /// returning a receiver the host drains on its own schedule.
    fn listen(&self, token: &str) -> TransportResult<Receiver<InboundMessage>>;

    /// Marks a message read and/or processed, so the transport can advance
    /// its own delivery cursor.
    fn mark(&self, channel_id: &str, sequence: u64, read: bool, processed: bool) -> TransportResult<()>;
}
