//! What a session reports back to the application.

use gomoku_board::Point;
use gomoku_match::{Committed, Desync, Undone};

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// The channel closed from the other side (or failed).
    PeerLeft,
    /// The local player left.
    LocalLeave,
    /// The peer never completed the handshake in time.
    HandshakeTimeout,
    /// An inbound message was illegal for the local match.
    Desync(Desync),
    /// The peer sent something that isn't valid protocol.
    ProtocolViolation(String),
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PeerLeft => write!(f, "opponent left"),
            Self::LocalLeave => write!(f, "you left"),
            Self::HandshakeTimeout => write!(f, "opponent never answered"),
            Self::Desync(d) => write!(f, "games out of sync: {d}"),
            Self::ProtocolViolation(why) => write!(f, "protocol violation: {why}"),
        }
    }
}

/// Something the peer did, or a lifecycle change, for the UI to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The handshake completed; the session is now active.
    PeerJoined { nickname: String },
    /// The peer is hovering over this point (advisory MOVE).
    PeerConsidering(Point),
    /// The peer committed a move and it is now on the local board.
    OpponentMoved(Committed),
    /// The peer asks to take back the last ply. Answer with
    /// `answer_undo`.
    UndoRequested,
    /// The peer granted our undo request; this stone came off.
    UndoAccepted(Undone),
    /// The peer declined our undo request.
    UndoRejected,
    /// A chat line from the peer.
    Chat { text: String, style: String },
    /// The peer restarted the match.
    Restarted,
    /// The session is over.
    Ended(EndReason),
}
