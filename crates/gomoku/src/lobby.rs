//! Setting up a match: the builder, hosting, and joining.
//!
//! ```rust,no_run
//! use gomoku::prelude::*;
//!
//! # async fn demo() -> Result<(), GomokuError> {
//! // Host: bind, tell the other player the code, wait.
//! let lobby = GomokuPeer::builder().nickname("alice").host("0.0.0.0:9000").await?;
//! println!("room code: {}", lobby.room_code());
//! let mut peer = lobby.accept().await?;
//!
//! // Joiner (on the other machine):
//! // let mut peer = GomokuPeer::builder()
//! //     .nickname("bob")
//! //     .join("192.168.1.20:9000", &"482913".parse()?)
//! //     .await?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;

use gomoku_board::Color;
use gomoku_session::{SessionConfig, SessionEvent};
use gomoku_transport::{Connection, TransportError, WebSocketListener};

use crate::peer::{spawn_peer, PeerEvents, PeerHandle};
use crate::{GomokuError, PeerConfig, RoomCode};

// ---------------------------------------------------------------------------
// GomokuPeer
// ---------------------------------------------------------------------------

/// One side of a running networked match.
///
/// Holds the [`PeerHandle`] for sending intents and the [`PeerEvents`]
/// stream for what the opponent does. Use [`split`](Self::split) to hand
/// them to different tasks.
pub struct GomokuPeer {
    handle: PeerHandle,
    events: PeerEvents,
}

impl GomokuPeer {
    /// Creates a new builder.
    pub fn builder() -> GomokuPeerBuilder {
        GomokuPeerBuilder::new()
    }

    /// The intent side. Cheap to clone.
    pub fn handle(&self) -> &PeerHandle {
        &self.handle
    }

    /// Waits for the next event from the session.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.next().await
    }

    pub fn split(self) -> (PeerHandle, PeerEvents) {
        (self.handle, self.events)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a peer.
pub struct GomokuPeerBuilder {
    session_config: SessionConfig,
    peer_config: PeerConfig,
}

impl GomokuPeerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            peer_config: PeerConfig::default(),
        }
    }

    /// Sets the name announced to the opponent.
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.session_config.nickname = nickname.into();
        self
    }

    /// Whether to show the opponent which point you are considering.
    pub fn share_candidates(mut self, share: bool) -> Self {
        self.session_config.share_candidates = share;
        self
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the actor configuration.
    pub fn peer_config(mut self, config: PeerConfig) -> Self {
        self.peer_config = config;
        self
    }

    /// Binds a listener at `addr` and draws a room code. The host plays
    /// black.
    pub async fn host(self, addr: &str) -> Result<HostLobby, GomokuError> {
        let listener = WebSocketListener::bind(addr).await?;
        let room_code = RoomCode::generate();
        tracing::info!(%room_code, addr, "hosting room");
        Ok(HostLobby {
            listener,
            room_code,
            builder: self,
        })
    }

    /// Dials the host at `addr` (host:port) for room `code`. The joiner
    /// plays white.
    ///
    /// Gives up after the handshake timeout if the host does not answer.
    pub async fn join(
        self,
        addr: &str,
        code: &RoomCode,
    ) -> Result<GomokuPeer, GomokuError> {
        let url = format!("ws://{addr}/{code}");
        let timeout = self.peer_config.handshake_timeout;
        let conn = tokio::time::timeout(timeout, gomoku_transport::connect(&url))
            .await
            .map_err(|_| {
                TransportError::ConnectFailed(format!(
                    "no answer from {addr} within {timeout:?}"
                ))
            })??;
        Ok(self.attach(conn, Color::White))
    }

    /// Starts a peer over an already open channel, playing `color`.
    ///
    /// `host` and `join` end here; it is also how tests and local setups
    /// run a match over a [`MemoryConnection`](gomoku_transport::MemoryConnection).
    pub fn attach<C: Connection>(self, conn: C, color: Color) -> GomokuPeer {
        let (handle, events) =
            spawn_peer(conn, color, self.session_config, self.peer_config);
        GomokuPeer { handle, events }
    }
}

impl Default for GomokuPeerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// HostLobby
// ---------------------------------------------------------------------------

/// A bound, waiting host. Share [`room_code`](Self::room_code) and the
/// address with the other player, then call [`accept`](Self::accept).
pub struct HostLobby {
    listener: WebSocketListener,
    room_code: RoomCode,
    builder: GomokuPeerBuilder,
}

impl HostLobby {
    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr, GomokuError> {
        Ok(self.listener.local_addr()?)
    }

    /// Waits for a joiner with the right room code and starts the match.
    ///
    /// Joiners with a wrong code are turned away and the wait continues.
    pub async fn accept(self) -> Result<GomokuPeer, GomokuError> {
        let conn = self.listener.accept(self.room_code.as_str()).await?;
        Ok(self.builder.attach(conn, Color::Black))
    }
}
