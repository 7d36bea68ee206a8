//! Match state machine for Gomoku Link.
//!
//! A [`Match`] is one side's copy of the shared game: board, history,
//! whose turn it is, the win (if any), and the undo negotiation flags.
//! Two peers each hold their own `Match` and keep them identical by
//! applying the same transitions in the same order.
//!
//! # Two kinds of failure
//!
//! - [`Rejection`]: a *local* intent broke a precondition (wrong turn,
//!   occupied cell). Nothing changed, nothing should be sent.
//! - [`Desync`]: a *remote* message implies a transition that is illegal
//!   here. The two copies have diverged and the session must end.
//!
//! # Key types
//!
//! - [`Match`]: the state machine itself
//! - [`Seat`]: which colors this side controls (hotseat or one color)
//! - [`MatchState`]: `InProgress` or `Won`
//! - [`UndoNegotiation`]: outstanding undo requests, per direction
//! - [`IncomingUndo`]: how a peer's undo request was taken (crossings)
//! - [`MatchView`]: read-only snapshot for rendering

mod error;
mod game;
mod state;

pub use error::{Desync, Rejection};
pub use game::{Committed, Match, MatchView, Undone};
pub use state::{IncomingUndo, MatchState, Seat, Tally, UndoNegotiation};
