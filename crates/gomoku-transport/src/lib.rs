//! Channel abstraction for Gomoku Link.
//!
//! Two peers talk over a *channel*: an ordered, reliable, two-endpoint
//! byte pipe. This crate provides the [`Connection`] trait that the rest of
//! the stack codes against, plus two implementations:
//!
//! - [`WebSocketConnection`]: the real thing, via `tokio-tungstenite`.
//!   [`WebSocketListener`] hosts a room, [`connect`] joins one.
//! - [`MemoryConnection`]: an in-process pair for tests and local play.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket channel via `tokio-tungstenite`

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::MemoryConnection;
#[cfg(feature = "websocket")]
pub use websocket::{connect, WebSocketConnection, WebSocketListener};

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter shared by every implementation so ids stay unique per process.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection, used to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Draws the next process-wide id.
    pub(crate) fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One end of a channel that can send and receive frames.
///
/// Frames arrive whole and in the order they were sent. Methods take
/// `&self` so one task can sit in [`recv`](Connection::recv) while
/// another sends.
///
/// The futures are declared `Send` so a peer actor that is generic over
/// the connection can still be handed to `tokio::spawn`. Implementations
/// just write `async fn`.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the remote peer.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the connection. The remote side's `recv` then yields `None`.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
