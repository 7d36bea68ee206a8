//! Turn-sync session for Gomoku Link.
//!
//! Two peers each keep a full copy of the match. There is no server and
//! no authority: the copies stay identical because each side only commits
//! moves on its own turn and applies the other's commits in order. This
//! crate is the glue between that rule and the wire.
//!
//! # How it fits in the stack
//!
//! ```text
//! Peer actor (above)  ← owns the channel, feeds frames in, sends what comes out
//!     ↕
//! Session Layer (this crate)  ← handshake, message ↔ transition mapping
//!     ↕
//! Match Layer (below)  ← turns, history, undo, restart
//! ```
//!
//! [`SyncSession`] does no I/O, so everything here can be tested by
//! passing messages between two sessions by hand.

mod error;
mod event;
mod session;

pub use error::SessionError;
pub use event::{EndReason, SessionEvent};
pub use session::{SessionConfig, SessionPhase, SyncSession};
