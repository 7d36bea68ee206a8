//! The win oracle: does the last stone complete five in a row?
//!
//! Only the four lines through the last-placed stone can have changed,
//! so there is no need to scan the whole board. Each scan walks at most
//! `BOARD_SIZE` cells per direction.

use serde::{Deserialize, Serialize};

use crate::{Board, Color, Point};

/// Number of contiguous stones needed to win.
pub const WIN_LENGTH: usize = 5;

/// Scan directions, in the order they are checked.
///
/// horizontal, vertical, diagonal `\`, diagonal `/`. When a stone
/// completes two lines at once, the first one in this order is reported.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A finished line: who won and which stones did it.
///
/// `line` is ordered center-outward: the winning stone first, then the
/// stones found walking forward along the direction, then the ones found
/// walking backward. The order only matters for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub winner: Color,
    pub line: Vec<Point>,
}

/// Checks whether the stone just placed at `last` wins for `color`.
///
/// The caller must have already written `color` at `last`; asking about
/// any other cell is a logic error (checked in debug builds).
pub fn evaluate_win(
    board: &Board,
    last: Point,
    color: Color,
) -> Option<WinResult> {
    debug_assert_eq!(
        board.cell(last),
        Some(color),
        "evaluate_win called for a cell that does not hold the mover's stone"
    );

    for (dx, dy) in DIRECTIONS {
        let mut line = vec![last];
        extend_run(board, last, color, dx, dy, &mut line);
        extend_run(board, last, color, -dx, -dy, &mut line);

        if line.len() >= WIN_LENGTH {
            return Some(WinResult {
                winner: color,
                line,
            });
        }
    }

    None
}

/// Walks from `origin` along `(dx, dy)`, appending same-colored stones
/// until it meets an edge, an empty cell, or the other color.
fn extend_run(
    board: &Board,
    origin: Point,
    color: Color,
    dx: isize,
    dy: isize,
    line: &mut Vec<Point>,
) {
    let mut distance = 1;
    while let Some(next) = origin.offset(dx, dy, distance) {
        if board.cell(next) != Some(color) {
            break;
        }
        line.push(next);
        distance += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BOARD_SIZE;

    fn board_with(stones: &[(usize, usize, Color)]) -> Board {
        let mut board = Board::empty();
        for &(x, y, color) in stones {
            board.place(Point::new(x, y), color).unwrap();
        }
        board
    }

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_four_in_a_row_is_not_a_win() {
        let board = board_with(&[
            (3, 3, Color::Black),
            (4, 3, Color::Black),
            (5, 3, Color::Black),
            (6, 3, Color::Black),
        ]);
        assert_eq!(evaluate_win(&board, p(6, 3), Color::Black), None);
    }

    #[test]
    fn test_horizontal_line_in_center_outward_order() {
        // Last stone in the middle of the run: forward first, then back.
        let board = board_with(&[
            (3, 3, Color::Black),
            (4, 3, Color::Black),
            (5, 3, Color::Black),
            (6, 3, Color::Black),
            (7, 3, Color::Black),
        ]);
        let result = evaluate_win(&board, p(5, 3), Color::Black).unwrap();
        assert_eq!(result.winner, Color::Black);
        assert_eq!(
            result.line,
            vec![p(5, 3), p(6, 3), p(7, 3), p(4, 3), p(3, 3)]
        );
    }

    #[test]
    fn test_vertical_win() {
        let stones: Vec<_> =
            (2..7).map(|y| (10, y, Color::White)).collect();
        let board = board_with(&stones);
        let result = evaluate_win(&board, p(10, 2), Color::White).unwrap();
        assert_eq!(result.winner, Color::White);
        assert_eq!(
            result.line,
            vec![p(10, 2), p(10, 3), p(10, 4), p(10, 5), p(10, 6)]
        );
    }

    #[test]
    fn test_backslash_diagonal_win() {
        let stones: Vec<_> =
            (0..5).map(|i| (i, i, Color::Black)).collect();
        let board = board_with(&stones);
        let result = evaluate_win(&board, p(4, 4), Color::Black).unwrap();
        assert_eq!(
            result.line,
            vec![p(4, 4), p(3, 3), p(2, 2), p(1, 1), p(0, 0)]
        );
    }

    #[test]
    fn test_slash_diagonal_win() {
        // (x, y) = (10,4), (11,3), (12,2), (13,1), (14,0)
        let stones: Vec<_> =
            (0..5).map(|i| (10 + i, 4 - i, Color::White)).collect();
        let board = board_with(&stones);
        let result = evaluate_win(&board, p(10, 4), Color::White).unwrap();
        assert_eq!(result.line.len(), 5);
        // Forward along (1, -1) walks up and to the right.
        assert_eq!(result.line[1], p(11, 3));
    }

    #[test]
    fn test_run_blocked_by_other_color() {
        let board = board_with(&[
            (0, 0, Color::Black),
            (1, 0, Color::Black),
            (2, 0, Color::White),
            (3, 0, Color::Black),
            (4, 0, Color::Black),
            (5, 0, Color::Black),
        ]);
        assert_eq!(evaluate_win(&board, p(1, 0), Color::Black), None);
        assert_eq!(evaluate_win(&board, p(5, 0), Color::Black), None);
    }

    #[test]
    fn test_run_along_far_edge() {
        let y = BOARD_SIZE - 1;
        let stones: Vec<_> = (BOARD_SIZE - 5..BOARD_SIZE)
            .map(|x| (x, y, Color::Black))
            .collect();
        let board = board_with(&stones);
        let result =
            evaluate_win(&board, p(BOARD_SIZE - 1, y), Color::Black).unwrap();
        assert_eq!(result.line.len(), 5);
    }

    #[test]
    fn test_overline_counts_as_win() {
        let stones: Vec<_> =
            (0..6).map(|x| (x, 8, Color::White)).collect();
        let board = board_with(&stones);
        let result = evaluate_win(&board, p(2, 8), Color::White).unwrap();
        assert_eq!(result.line.len(), 6);
    }

    #[test]
    fn test_double_win_reports_horizontal_first() {
        // A cross through (7,7): both the row and the column are complete.
        let mut stones = Vec::new();
        for i in 5..10 {
            stones.push((i, 7, Color::Black));
            if i != 7 {
                stones.push((7, i, Color::Black));
            }
        }
        let board = board_with(&stones);
        let result = evaluate_win(&board, p(7, 7), Color::Black).unwrap();
        assert!(result.line.iter().all(|pt| pt.y == 7));
    }
}
