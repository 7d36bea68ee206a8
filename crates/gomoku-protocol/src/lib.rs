//! Wire protocol for Gomoku Link.
//!
//! This crate defines what two peers say to each other:
//!
//! - **Messages** ([`PeerMessage`]): the eight frame types of the
//!   turn-sync protocol.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how a message becomes
//!   bytes on the channel and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong on the way.
//!
//! It knows nothing about connections or match rules.
//!
//! ```text
//! Transport (bytes) → Protocol (PeerMessage) → Session (match sync)
//! ```

mod codec;
mod error;
mod message;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{PeerMessage, MAX_NICKNAME_LEN};
