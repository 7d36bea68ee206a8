//! Grid, coordinates, and stone colors.
//!
//! Every type here is plain data: `Copy` where it's small, `Clone` where
//! it isn't, and `Serialize`/`Deserialize` so the same values can travel
//! on the wire and into render snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 15;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The color of a stone, and by extension the side that plays it.
///
/// Black always opens a fresh match.
///
/// `#[serde(rename_all = "lowercase")]` keeps the JSON form as
/// `"black"` / `"white"`, which is what the peer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the other color.
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
        }
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell coordinate: `x` is the column, `y` is the row.
///
/// The fields are public and unchecked so a `Point` can be deserialized
/// straight from a peer's message. Anything that touches the board
/// checks [`Point::in_bounds`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    /// Creates a point without range checking.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the point addresses a cell on the board.
    pub fn in_bounds(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Steps `distance` cells along `(dx, dy)`.
    ///
    /// Returns `None` when the step would leave the board, which is how
    /// the win scan knows it hit an edge.
    pub(crate) fn offset(
        &self,
        dx: isize,
        dy: isize,
        distance: isize,
    ) -> Option<Self> {
        let x = self.x as isize + dx * distance;
        let y = self.y as isize + dy * distance;
        let limit = BOARD_SIZE as isize;
        if (0..limit).contains(&x) && (0..limit).contains(&y) {
            Some(Self::new(x as usize, y as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A 15×15 grid where each cell is empty (`None`) or holds a stone.
///
/// Stored row-major (`cells[y][x]`). The array is small enough
/// (225 bytes of `Option<Color>`) that cloning it for every history
/// snapshot is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Color>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Returns a board with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Returns the stone at `point`, or `None` if the cell is empty or
    /// off the board.
    pub fn cell(&self, point: Point) -> Option<Color> {
        self.cells
            .get(point.y)
            .and_then(|row| row.get(point.x))
            .copied()
            .flatten()
    }

    /// Returns `true` if `point` is on the board and nothing sits there.
    pub fn is_empty_at(&self, point: Point) -> bool {
        point.in_bounds() && self.cells[point.y][point.x].is_none()
    }

    /// Puts a stone of `color` on `point`.
    ///
    /// # Errors
    /// [`BoardError::OutOfBounds`] for a point off the grid,
    /// [`BoardError::Occupied`] if a stone is already there.
    pub fn place(
        &mut self,
        point: Point,
        color: Color,
    ) -> Result<(), BoardError> {
        if !point.in_bounds() {
            return Err(BoardError::OutOfBounds(point));
        }
        let cell = &mut self.cells[point.y][point.x];
        if cell.is_some() {
            return Err(BoardError::Occupied(point));
        }
        *cell = Some(color);
        Ok(())
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>; BOARD_SIZE]> {
        self.cells.iter()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
