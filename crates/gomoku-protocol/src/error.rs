//! Error types for the protocol layer.

/// Errors that can occur while turning [`PeerMessage`](crate::PeerMessage)s
/// into bytes and back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not a message we understand: malformed JSON, an
    /// unknown `type`, or a payload of the wrong shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded fine but breaks a protocol rule, e.g. a
    /// handshake with an empty nickname.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
