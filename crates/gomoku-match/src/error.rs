//! Error types for the match layer.
//!
//! The split between [`Rejection`] and [`Desync`] is the whole error
//! policy of the game: one is a user mistake, the other a broken session.

use gomoku_board::{Color, Point};

/// A local intent was refused. No state changed and no message should
/// be sent; the caller can simply re-prompt the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The match already has a winner.
    #[error("the match is over")]
    MatchOver,

    /// The side to move is not controlled locally.
    #[error("it is {0}'s turn")]
    NotYourTurn(Color),

    /// The point is off the board.
    #[error("point {0} is off the board")]
    OutOfBounds(Point),

    /// A stone already sits there.
    #[error("cell {0} is occupied")]
    Occupied(Point),

    /// Commit was asked for without a proposed move.
    #[error("no move has been proposed")]
    NoPendingMove,

    /// There is no committed ply to take back.
    #[error("there is no move to undo")]
    NothingToUndo,

    /// This side already asked for an undo and is waiting for an answer.
    #[error("an undo request is already waiting for an answer")]
    UndoAlreadyRequested,

    /// Accept/reject was called but the peer never asked.
    #[error("the opponent has not asked for an undo")]
    NoUndoRequest,

    /// An undo negotiation must be settled first.
    #[error("an undo negotiation is still open")]
    UndoOutstanding,

    /// Online undo goes through the request/accept exchange.
    #[error("undo needs the opponent's agreement")]
    NeedsAgreement,

    /// The operation makes no sense for this seat (e.g. undo
    /// negotiation on a shared device).
    #[error("not available in hotseat mode")]
    Hotseat,
}

/// A remote message implies a transition that is illegal for the local
/// copy of the match.
///
/// There is no authority to ask which copy is right, so the only safe
/// reaction is to end the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Desync {
    /// A move arrived after the match was already won here.
    #[error("peer moved after the match ended")]
    MatchOver,

    /// A move arrived for a color that is not the one expected to move,
    /// or for a color this side controls.
    #[error("peer moved as {got}, but {expected} is expected to move")]
    WrongMover { expected: Color, got: Color },

    /// The peer's move targets a cell that is taken or off the board.
    #[error("peer moved onto unavailable cell {0}")]
    CellUnavailable(Point),

    /// The peer asked for an undo while an earlier request from it is
    /// still undecided.
    #[error("peer sent a second undo request before the first was answered")]
    DuplicateUndoRequest,

    /// An undo answer arrived but this side never asked.
    #[error("peer answered an undo request that was never sent")]
    NoOutstandingUndo,

    /// The peer accepted an undo but there is nothing to retract here.
    #[error("peer accepted an undo but no move is left to retract")]
    NothingToUndo,

    /// Remote input reached a hotseat match.
    #[error("remote input for a hotseat match")]
    Hotseat,
}
