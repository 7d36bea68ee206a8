//! Unified error type for Gomoku Link.

use gomoku_protocol::ProtocolError;
use gomoku_session::SessionError;
use gomoku_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GomokuError {
    /// A transport-level error (bind, connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session refused an intent, or ended because of the peer.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The peer actor has stopped; the handle is no longer usable.
    #[error("peer task is no longer running")]
    ActorGone,
}

impl GomokuError {
    /// Returns `true` for a refused local intent, the kind of error a UI
    /// shows and moves on from.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Session(SessionError::Rejected(_)))
    }
}
