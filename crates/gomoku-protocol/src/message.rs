//! The messages two peers exchange.
//!
//! Every frame on the channel is one [`PeerMessage`], encoded as an
//! adjacently tagged JSON object:
//!
//! ```json
//! { "type": "CONFIRM_MOVE", "payload": { "x": 7, "y": 7 } }
//! { "type": "UNDO_REQUEST" }
//! ```
//!
//! There are no sequence numbers. The channel is reliable and ordered, and
//! turn ownership keeps the two sides from ever racing on a move.

use gomoku_board::Point;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Longest nickname a peer may announce, in characters.
pub const MAX_NICKNAME_LEN: usize = 32;

/// One frame of the peer-to-peer protocol.
///
/// `#[serde(tag = "type", content = "payload")]` puts the variant name in
/// `type` and its data (if any) in `payload`. Variants without data
/// serialize as `{"type": "..."}` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum PeerMessage {
    /// First message on a fresh channel, sent by both sides.
    Handshake { nickname: String },

    /// The sender is considering this point. Advisory only: the receiver
    /// may show it, but nothing about the match changes.
    Move(Point),

    /// The sender committed a stone here. The receiver applies it for the
    /// sender's color.
    ConfirmMove(Point),

    /// The sender asks to take back the most recent ply.
    UndoRequest,

    /// The sender granted our undo request and already retracted the ply.
    UndoAccept,

    /// The sender declined our undo request.
    UndoReject,

    /// Free text. `style` is an opaque tag (a CSS color in the browser
    /// client) passed through untouched.
    Chat {
        text: String,
        #[serde(rename = "color", default)]
        style: String,
    },

    /// The sender reset the match to a fresh board.
    Restart,
}

impl PeerMessage {
    /// The wire name of this message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handshake { .. } => "HANDSHAKE",
            Self::Move(_) => "MOVE",
            Self::ConfirmMove(_) => "CONFIRM_MOVE",
            Self::UndoRequest => "UNDO_REQUEST",
            Self::UndoAccept => "UNDO_ACCEPT",
            Self::UndoReject => "UNDO_REJECT",
            Self::Chat { .. } => "CHAT",
            Self::Restart => "RESTART",
        }
    }

    /// Checks rules serde can't express.
    ///
    /// Points are *not* checked here: an off-board `CONFIRM_MOVE` is a
    /// desync, and the match layer reports it as one.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` for a blank or overlong
    /// nickname.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if let Self::Handshake { nickname } = self {
            if nickname.trim().is_empty() {
                return Err(ProtocolError::InvalidMessage(
                    "handshake nickname is empty".into(),
                ));
            }
            if nickname.chars().count() > MAX_NICKNAME_LEN {
                return Err(ProtocolError::InvalidMessage(format!(
                    "handshake nickname longer than {MAX_NICKNAME_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}
