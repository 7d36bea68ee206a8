//! Error types for the board layer.

use crate::Point;

/// Errors that can occur when writing to a [`Board`](crate::Board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The point lies outside the 15×15 grid.
    ///
    /// Points decoded from the wire are not range-checked at parse time,
    /// so this is how a malformed coordinate surfaces.
    #[error("point {0} is off the board")]
    OutOfBounds(Point),

    /// A stone already sits on this cell.
    #[error("cell {0} is already occupied")]
    Occupied(Point),
}
