//! The [`Match`] state machine.
//!
//! Every mutation goes through one of the transition methods below and
//! each of them validates before touching anything, so a failed call
//! leaves the match exactly as it was.
//!
//! Invariants held after every transition:
//!
//! - `board == history.last()`
//! - `history.len() == moves.len() + 1`
//! - ply `i` (0-based) was played by black when `i` is even, white when
//!   odd, because black opens and colors strictly alternate

use gomoku_board::{evaluate_win, Board, BoardError, Color, Point, WinResult};
use serde::{Deserialize, Serialize};

use crate::{
    Desync, IncomingUndo, MatchState, Rejection, Seat, Tally, UndoNegotiation,
};

/// A move that made it onto the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committed {
    pub point: Point,
    pub color: Color,
    /// Set when this move won the match.
    pub win: Option<WinResult>,
}

/// The stone removed by an undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Undone {
    pub point: Point,
    pub color: Color,
}

/// A read-only snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub board: Board,
    pub pending: Option<Point>,
    pub state: MatchState,
    /// Stones to highlight, when the match is won.
    pub win_line: Option<Vec<Point>>,
    pub plies: usize,
    pub tally: Tally,
    pub negotiation: UndoNegotiation,
}

/// One side's copy of a gomoku match.
#[derive(Debug, Clone)]
pub struct Match {
    seat: Seat,
    board: Board,
    history: Vec<Board>,
    moves: Vec<Point>,
    state: MatchState,
    pending: Option<Point>,
    negotiation: UndoNegotiation,
    tally: Tally,
}

impl Match {
    /// Creates a fresh match: empty board, black to move.
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            board: Board::empty(),
            history: vec![Board::empty()],
            moves: Vec::new(),
            state: MatchState::initial(),
            pending: None,
            negotiation: UndoNegotiation::default(),
            tally: Tally::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Local moves
    // -----------------------------------------------------------------------

    /// Marks `point` as the move the local player is considering.
    ///
    /// Proposing again overwrites the previous candidate. Nothing is
    /// transmitted; this only lets the mover reconsider before commit.
    pub fn propose_local_move(
        &mut self,
        point: Point,
    ) -> Result<(), Rejection> {
        let current = self.local_turn()?;
        if !point.in_bounds() {
            return Err(Rejection::OutOfBounds(point));
        }
        if !self.board.is_empty_at(point) {
            return Err(Rejection::Occupied(point));
        }
        tracing::trace!(%point, color = %current, "move proposed");
        self.pending = Some(point);
        Ok(())
    }

    /// Drops the proposed move, if any.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Commits the proposed move.
    ///
    /// This is the only place the local side advances the shared state.
    /// The caller must send the returned move to the peer.
    ///
    /// Refused while an undo negotiation is open: the ply an answer
    /// retracts must be the same on both copies.
    pub fn commit_local_move(&mut self) -> Result<Committed, Rejection> {
        let point = self.pending.ok_or(Rejection::NoPendingMove)?;
        let color = self.local_turn()?;
        if self.negotiation.is_open() {
            return Err(Rejection::UndoOutstanding);
        }
        let committed =
            self.advance(point, color).map_err(|e| match e {
                BoardError::OutOfBounds(p) => Rejection::OutOfBounds(p),
                BoardError::Occupied(p) => Rejection::Occupied(p),
            })?;
        tracing::debug!(%point, %color, won = committed.win.is_some(), "local move committed");
        Ok(committed)
    }

    // -----------------------------------------------------------------------
    // Remote moves
    // -----------------------------------------------------------------------

    /// Applies a move the peer committed on its own copy.
    ///
    /// `color` must be the color expected to move and must not be one this
    /// side controls. Anything else means the copies have diverged.
    pub fn apply_remote_move(
        &mut self,
        point: Point,
        color: Color,
    ) -> Result<Committed, Desync> {
        if self.seat == Seat::Hotseat {
            return Err(Desync::Hotseat);
        }
        let expected = self.state.current().ok_or(Desync::MatchOver)?;
        if color != expected || self.seat.controls(color) {
            return Err(Desync::WrongMover {
                expected,
                got: color,
            });
        }
        let committed = self.advance(point, color).map_err(|e| match e {
            BoardError::OutOfBounds(p) | BoardError::Occupied(p) => {
                Desync::CellUnavailable(p)
            }
        })?;
        tracing::debug!(%point, %color, won = committed.win.is_some(), "remote move applied");
        Ok(committed)
    }

    // -----------------------------------------------------------------------
    // Undo negotiation
    // -----------------------------------------------------------------------

    /// Opens an undo request toward the peer.
    pub fn request_undo(&mut self) -> Result<(), Rejection> {
        if self.seat == Seat::Hotseat {
            return Err(Rejection::Hotseat);
        }
        if self.negotiation.awaiting_response {
            return Err(Rejection::UndoAlreadyRequested);
        }
        if self.negotiation.pending_decision {
            return Err(Rejection::UndoOutstanding);
        }
        if !self.can_undo() {
            return Err(Rejection::NothingToUndo);
        }
        self.negotiation.awaiting_response = true;
        Ok(())
    }

    /// Records that the peer asked for an undo.
    ///
    /// If our own request is still unanswered the two crossed on the
    /// wire. Black's request stands on both copies: as white we withdraw
    /// ours and record the peer's, as black we ignore the peer's.
    pub fn record_undo_request(&mut self) -> Result<IncomingUndo, Desync> {
        let local = self.seat.color().ok_or(Desync::Hotseat)?;
        if self.negotiation.pending_decision {
            return Err(Desync::DuplicateUndoRequest);
        }
        if self.negotiation.awaiting_response {
            if local == Color::Black {
                tracing::debug!("crossing undo request ignored");
                return Ok(IncomingUndo::Ignored);
            }
            tracing::debug!("own undo request withdrawn for crossing one");
            self.negotiation.awaiting_response = false;
        }
        self.negotiation.pending_decision = true;
        Ok(IncomingUndo::Recorded)
    }

    /// Grants the peer's undo request, retracting the last ply.
    ///
    /// If there is nothing left to retract (a restart crossed the
    /// request) the request stays open so it can be rejected.
    pub fn accept_undo(&mut self) -> Result<Undone, Rejection> {
        if !self.negotiation.pending_decision {
            return Err(Rejection::NoUndoRequest);
        }
        let undone =
            self.retract_last_ply().ok_or(Rejection::NothingToUndo)?;
        self.negotiation.pending_decision = false;
        Ok(undone)
    }

    /// Declines the peer's undo request.
    pub fn reject_undo(&mut self) -> Result<(), Rejection> {
        if !self.negotiation.pending_decision {
            return Err(Rejection::NoUndoRequest);
        }
        self.negotiation.pending_decision = false;
        Ok(())
    }

    /// The peer granted our request: retract the last ply here too.
    pub fn apply_undo_accepted(&mut self) -> Result<Undone, Desync> {
        if !self.negotiation.awaiting_response {
            return Err(Desync::NoOutstandingUndo);
        }
        self.negotiation.awaiting_response = false;
        self.retract_last_ply().ok_or(Desync::NothingToUndo)
    }

    /// The peer declined our request.
    pub fn apply_undo_rejected(&mut self) -> Result<(), Desync> {
        if !self.negotiation.awaiting_response {
            return Err(Desync::NoOutstandingUndo);
        }
        self.negotiation.awaiting_response = false;
        Ok(())
    }

    /// Takes back the last ply without negotiation. Hotseat only: both
    /// players are at the same device and can agree in person.
    pub fn take_back(&mut self) -> Result<Undone, Rejection> {
        if self.seat != Seat::Hotseat {
            return Err(Rejection::NeedsAgreement);
        }
        self.retract_last_ply().ok_or(Rejection::NothingToUndo)
    }

    // -----------------------------------------------------------------------
    // Restart / teardown
    // -----------------------------------------------------------------------

    /// Resets to a fresh match. The tally survives.
    pub fn restart(&mut self) {
        self.board = Board::empty();
        self.history = vec![Board::empty()];
        self.moves.clear();
        self.state = MatchState::initial();
        self.pending = None;
        tracing::debug!("match restarted");
    }

    /// Drops the ephemeral state when the session ends. The board is left
    /// as it was.
    pub fn abandon(&mut self) {
        self.negotiation = UndoNegotiation::default();
        self.pending = None;
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// The color to move, `None` once the match is won.
    pub fn current(&self) -> Option<Color> {
        self.state.current()
    }

    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    pub fn win_line(&self) -> Option<&[Point]> {
        match &self.state {
            MatchState::Won(result) => Some(&result.line),
            MatchState::InProgress { .. } => None,
        }
    }

    /// Board snapshots, index 0 being the empty board.
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// Committed points in play order.
    pub fn moves(&self) -> &[Point] {
        &self.moves
    }

    /// Number of committed plies.
    pub fn plies(&self) -> usize {
        self.moves.len()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn negotiation(&self) -> UndoNegotiation {
        self.negotiation
    }

    /// Returns `true` if at least one ply can be retracted.
    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }

    /// Returns `true` if the match is in progress and the side to move is
    /// controlled here.
    pub fn is_local_turn(&self) -> bool {
        self.state
            .current()
            .is_some_and(|current| self.seat.controls(current))
    }

    /// Clones out a snapshot for rendering.
    pub fn view(&self) -> MatchView {
        MatchView {
            board: self.board.clone(),
            pending: self.pending,
            state: self.state.clone(),
            win_line: self.win_line().map(<[Point]>::to_vec),
            plies: self.plies(),
            tally: self.tally,
            negotiation: self.negotiation,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Returns the color to move if this side may move it.
    fn local_turn(&self) -> Result<Color, Rejection> {
        let current = self.state.current().ok_or(Rejection::MatchOver)?;
        if !self.seat.controls(current) {
            return Err(Rejection::NotYourTurn(current));
        }
        Ok(current)
    }

    /// Color that played ply `index` (0-based).
    fn mover_of(&self, index: usize) -> Color {
        if index % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Places a stone and runs the win oracle. Shared by local commits and
    /// remote applies so both sides advance identically.
    fn advance(
        &mut self,
        point: Point,
        color: Color,
    ) -> Result<Committed, BoardError> {
        self.board.place(point, color)?;
        self.history.push(self.board.clone());
        self.moves.push(point);
        self.pending = None;

        let win = evaluate_win(&self.board, point, color);
        match &win {
            Some(result) => {
                self.tally.record(color);
                self.state = MatchState::Won(result.clone());
                tracing::info!(winner = %color, plies = self.moves.len(), "match won");
            }
            None => {
                self.state = MatchState::InProgress {
                    current: color.opponent(),
                };
            }
        }

        Ok(Committed { point, color, win })
    }

    /// Pops exactly one ply and hands the turn back to whoever played it.
    fn retract_last_ply(&mut self) -> Option<Undone> {
        if !self.can_undo() {
            return None;
        }
        self.history.pop();
        let point = self.moves.pop()?;
        let color = self.mover_of(self.moves.len());
        self.board = self.history.last().cloned().unwrap_or_default();

        if let MatchState::Won(result) = &self.state {
            self.tally.retract(result.winner);
        }
        self.state = MatchState::InProgress { current: color };
        self.pending = None;

        tracing::debug!(%point, %color, plies = self.moves.len(), "ply retracted");
        Some(Undone { point, color })
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new(Seat::Hotseat)
    }
}
