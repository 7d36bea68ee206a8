//! # Gomoku Link
//!
//! Two-player gomoku over a direct peer-to-peer link.
//!
//! There is no server. Each player runs a full copy of the match, and the
//! two copies stay identical because only the player whose turn it is may
//! commit a move, and every commit is applied by the other side in order.
//! Undo is negotiated (request, then accept or reject), chat and restart
//! ride along on the same channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gomoku::prelude::*;
//!
//! # async fn demo() -> Result<(), GomokuError> {
//! gomoku::init_tracing();
//!
//! let lobby = GomokuPeer::builder().nickname("alice").host("0.0.0.0:9000").await?;
//! println!("room code: {}", lobby.room_code());
//! let mut peer = lobby.accept().await?;
//!
//! while let Some(event) = peer.next_event().await {
//!     if let SessionEvent::PeerJoined { .. } = event {
//!         peer.handle().play(Point::new(7, 7)).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `gomoku-board`: board, colors, the five-in-a-row check
//! - `gomoku-match`: the per-side match state machine
//! - `gomoku-protocol`: the eight peer messages and their JSON codec
//! - `gomoku-transport`: the channel trait, WebSocket and in-memory links
//! - `gomoku-session`: maps messages to match transitions
//! - `gomoku` (this crate): the peer actor, hosting and joining

mod config;
mod error;
mod lobby;
mod peer;
mod room_code;

pub use config::PeerConfig;
pub use error::GomokuError;
pub use lobby::{GomokuPeer, GomokuPeerBuilder, HostLobby};
pub use peer::{PeerEvents, PeerHandle, PeerSnapshot};
pub use room_code::{InvalidRoomCode, RoomCode};

pub use gomoku_board as board;
pub use gomoku_match as game;
pub use gomoku_protocol as protocol;
pub use gomoku_session as session;
pub use gomoku_transport as transport;

/// Installs a `tracing` subscriber that reads `RUST_LOG`, defaulting to
/// `info`. Call once at startup; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub mod prelude {
    //! Everything an application usually needs, in one import.

    pub use crate::{
        GomokuError, GomokuPeer, GomokuPeerBuilder, HostLobby, PeerConfig,
        PeerEvents, PeerHandle, PeerSnapshot, RoomCode,
    };
    pub use gomoku_board::{Board, Color, Point, BOARD_SIZE};
    pub use gomoku_match::{
        Committed, Match, MatchState, MatchView, Rejection, Seat, Undone,
    };
    pub use gomoku_session::{
        EndReason, SessionConfig, SessionError, SessionEvent, SessionPhase,
    };
}
