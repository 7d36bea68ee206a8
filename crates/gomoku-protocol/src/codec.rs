//! Codec trait and implementations for turning messages into frames.
//!
//! The session never touches bytes directly. It hands a
//! [`PeerMessage`](crate::PeerMessage) to a [`Codec`] and passes the result
//! to the transport, so the wire format can change without the session
//! noticing.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec lives inside the peer actor,
/// which Tokio may move between worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON keeps frames readable in logs and in browser tooling, and is the
/// format both peers must agree on. Behind the `json` feature (on by
/// default).
///
/// ## Example
///
/// ```rust
/// use gomoku_board::Point;
/// use gomoku_protocol::{Codec, JsonCodec, PeerMessage};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&PeerMessage::ConfirmMove(Point::new(7, 7))).unwrap();
/// assert_eq!(bytes, br#"{"type":"CONFIRM_MOVE","payload":{"x":7,"y":7}}"#);
///
/// let decoded: PeerMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, PeerMessage::ConfirmMove(Point::new(7, 7)));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
