//! Runtime settings for a peer actor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the peer actor and its link.
///
/// Per-player settings (nickname, candidate sharing) live in
/// [`SessionConfig`](gomoku_session::SessionConfig); this covers the
/// plumbing around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerConfig {
    /// How long the peer has to complete the handshake once the link is
    /// up, and how long a joiner waits for the host to answer at all.
    ///
    /// Default: 5 seconds.
    pub handshake_timeout: Duration,

    /// Capacity of the command queue between handles and the actor.
    ///
    /// Default: 32.
    pub command_buffer: usize,

    /// Capacity of the queue between the reader task and the actor.
    ///
    /// Default: 64.
    pub inbound_buffer: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(5),
            command_buffer: 32,
            inbound_buffer: 64,
        }
    }
}
