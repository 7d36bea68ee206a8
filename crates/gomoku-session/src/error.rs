//! Error types for the session layer.

use gomoku_match::{Desync, Rejection};

/// Errors returned by [`SyncSession`](crate::SyncSession).
///
/// Local intents only ever fail with the non-fatal variants. Inbound
/// messages can fail fatally, in which case the session has already moved
/// to [`SessionPhase::Ended`](crate::SessionPhase::Ended) by the time the
/// error is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The match refused a local intent. Nothing changed, nothing to send.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The session is not active: the handshake hasn't completed yet, or
    /// the session has ended.
    #[error("session is not active")]
    Inactive,

    /// An inbound message was illegal for the local match state.
    #[error("desync: {0}")]
    Desync(#[from] Desync),

    /// The peer broke the protocol: undecodable frame, invalid handshake,
    /// or a message before the handshake.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl SessionError {
    /// Returns `true` if this error ended the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Desync(_) | Self::ProtocolViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_board::Color;

    #[test]
    fn test_fatality() {
        assert!(!SessionError::Rejected(Rejection::MatchOver).is_fatal());
        assert!(!SessionError::Inactive.is_fatal());
        assert!(SessionError::Desync(Desync::NoOutstandingUndo).is_fatal());
        assert!(SessionError::ProtocolViolation("x".into()).is_fatal());
    }

    #[test]
    fn test_rejection_message_passes_through() {
        let err: SessionError = Rejection::NotYourTurn(Color::White).into();
        assert_eq!(err.to_string(), "it is white's turn");
    }
}
