//! The transport abstraction: a uniform capability set every concrete
//! transport (`remote-transport`) implements.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

/// Identifies one connected peer of a multi-client transport.
///
/// Single-peer transports never hand one out; their notifications always
/// carry `peer: None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

/// An inbound notification from a transport to its owner.
///
/// Single-peer transports deliver raw bytes (`peer: None`); the frame
/// extractor lives with the owner. Multi-client server transports run a
/// per-peer frame extractor themselves and deliver complete frames
/// (`peer: Some(_)`).
#[derive(Debug, Clone)]
pub enum TransportMessage {
    /// Bytes (single-peer) or a complete frame (server transports) arrived.
    Data {
        /// The originating peer, or `None` for a single-peer transport.
        peer: Option<PeerId>,
        /// The payload: raw stream bytes, or one complete frame.
        bytes: Bytes,
    },
    /// The named peer (or the sole connection) closed.
    Closed {
        /// The peer that closed, or `None` for a single-peer transport.
        peer: Option<PeerId>,
    },
    /// The named peer (or the sole connection) errored.
    Error {
        /// The peer that errored, or `None` for a single-peer transport.
        peer: Option<PeerId>,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// Failure conditions surfaced by a [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The initial connection attempt failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    /// A send could not be delivered.
    #[error("send failed: {0}")]
    SendFailed(String),
    /// The transport is no longer usable.
    #[error("transport closed")]
    Closed,
}

/// Uniform capability set every concrete transport implements: send,
/// query connectedness, and disconnect.
///
/// `connect` is deliberately not a trait method here. Each transport kind
/// needs different construction inputs (a socket address, a filesystem
/// path, a URL, a bind address for the server) and a channel to deliver
/// [`TransportMessage`]s to its owner — awkward to express uniformly
/// through one object-safe associated function. `remote-transport` instead
/// exposes one free async function per transport kind that returns a
/// `Box<dyn Transport>` already connected (or listening); from that point
/// on, every transport is driven through this trait.
///
/// Object-safe by construction (`async_trait`, no associated types, no
/// generic methods) so the engine can hold `Box<dyn Transport>` without
/// knowing which concrete kind it owns.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Send `bytes` to the peer (single-peer transports) or broadcast to
    /// every connected peer (server transports).
    ///
    /// Server transports report `Ok` even when some peers failed and were
    /// dropped — broadcast delivery is best-effort per peer, not atomic
    /// across peers.
    async fn send(&mut self, bytes: Bytes) -> Result<(), TransportError>;

    /// Whether this transport currently has at least one live connection.
    fn connected(&self) -> bool;

    /// Tear down the transport: close any underlying socket(s) and stop
    /// delivering [`TransportMessage`]s.
    async fn disconnect(&mut self);
}

impl fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").field("connected", &self.connected()).finish()
    }
}
