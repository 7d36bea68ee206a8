//! Small state types the [`Match`](crate::Match) is built from.

use gomoku_board::{Color, WinResult};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// Which colors this side of the match controls.
///
/// - **Hotseat**: offline mode. Both players share one device, so
///   whoever's turn it is may move. There is no peer.
/// - **Player(color)**: online mode. Only `color` moves locally; the
///   other color only ever arrives through
///   [`Match::apply_remote_move`](crate::Match::apply_remote_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    Hotseat,
    Player(Color),
}

impl Seat {
    /// Returns `true` if `color` is moved by this side.
    pub fn controls(self, color: Color) -> bool {
        match self {
            Self::Hotseat => true,
            Self::Player(local) => local == color,
        }
    }

    /// The local color in online mode, `None` for hotseat.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Hotseat => None,
            Self::Player(color) => Some(color),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// Where the match is in its lifecycle.
///
/// ```text
///            commit / remote move
///          ┌──────────────────────┐
///          ▼                      │
///   InProgress { current } ───────┘
///          │  five in a row     ▲
///          ▼                    │ undo / restart
///      Won(result) ─────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// Play continues; `current` is the color to move.
    InProgress { current: Color },
    /// Someone completed a line.
    Won(WinResult),
}

impl MatchState {
    /// The state every fresh match starts in.
    pub fn initial() -> Self {
        Self::InProgress {
            current: Color::Black,
        }
    }

    pub fn is_won(&self) -> bool {
        matches!(self, Self::Won(_))
    }

    /// The color to move, or `None` once the match is won.
    pub fn current(&self) -> Option<Color> {
        match self {
            Self::InProgress { current } => Some(*current),
            Self::Won(_) => None,
        }
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress { current } => {
                write!(f, "InProgress({current} to move)")
            }
            Self::Won(result) => write!(f, "Won({})", result.winner),
        }
    }
}

// ---------------------------------------------------------------------------
// UndoNegotiation
// ---------------------------------------------------------------------------

/// Open undo requests, tracked separately for each direction.
///
/// - `awaiting_response`: this side asked and is waiting for the peer.
/// - `pending_decision`: the peer asked and this side hasn't answered.
///
/// At most one of the two is ever set. A side cannot ask while it owes
/// an answer, and when both players ask at the same moment black's
/// request stands and white's is withdrawn (see [`IncomingUndo`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoNegotiation {
    pub awaiting_response: bool,
    pub pending_decision: bool,
}

impl UndoNegotiation {
    /// Returns `true` if either direction has an open request.
    pub fn is_open(&self) -> bool {
        self.awaiting_response || self.pending_decision
    }
}

/// What became of an undo request received from the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingUndo {
    /// The request now waits for a local answer. If this side had a
    /// request of its own in flight, it was withdrawn.
    Recorded,
    /// The request crossed one of ours and lost the tie-break. The peer
    /// withdraws it on its side when ours arrives.
    Ignored,
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Wins per color across restarts within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub black: u32,
    pub white: u32,
}

impl Tally {
    pub fn wins(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub(crate) fn record(&mut self, color: Color) {
        *self.slot(color) += 1;
    }

    /// Takes back a win when the winning ply is undone.
    pub(crate) fn retract(&mut self, color: Color) {
        let slot = self.slot(color);
        *slot = slot.saturating_sub(1);
    }

    fn slot(&mut self, color: Color) -> &mut u32 {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_controls() {
        assert!(Seat::Hotseat.controls(Color::Black));
        assert!(Seat::Hotseat.controls(Color::White));
        assert!(Seat::Player(Color::White).controls(Color::White));
        assert!(!Seat::Player(Color::White).controls(Color::Black));
        assert_eq!(Seat::Hotseat.color(), None);
    }

    #[test]
    fn test_initial_state_is_black_to_move() {
        assert_eq!(MatchState::initial().current(), Some(Color::Black));
        assert!(!MatchState::initial().is_won());
    }

    #[test]
    fn test_match_state_display() {
        assert_eq!(
            MatchState::initial().to_string(),
            "InProgress(black to move)"
        );
    }

    #[test]
    fn test_negotiation_is_open() {
        let mut n = UndoNegotiation::default();
        assert!(!n.is_open());
        n.pending_decision = true;
        assert!(n.is_open());
    }

    #[test]
    fn test_tally_retract_never_underflows() {
        let mut tally = Tally::default();
        tally.retract(Color::Black);
        assert_eq!(tally.wins(Color::Black), 0);
        tally.record(Color::White);
        tally.record(Color::White);
        tally.retract(Color::White);
        assert_eq!(tally.wins(Color::White), 1);
    }
}
