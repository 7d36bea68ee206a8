//! Board model and win oracle for Gomoku Link.
//!
//! This crate is the bottom of the stack. It knows nothing about turns,
//! networking, or undo; it is only about a 15×15 grid of stones and how to
//! tell whether the last stone completed five in a row.
//!
//! ```text
//! Session (above)  ← drives turns and the wire protocol
//!     ↕
//! Match            ← owns a Board plus history and turn state
//!     ↕
//! Board (this crate)  ← grid, points, colors, win scan
//! ```

mod board;
mod error;
mod win;

pub use board::{Board, Color, Point, BOARD_SIZE};
pub use error::BoardError;
pub use win::{evaluate_win, WinResult, WIN_LENGTH};
