//! Win detection for five in a row.

use super::super::{Board, Cell, Color, Move};
use tracing::instrument;

/// Stones in a row needed to win. Longer runs also win.
pub const WIN_LENGTH: usize = 5;

/// Axis direction vectors: horizontal, vertical, and both diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the stone just placed at `mv` completes five in a row.
///
/// Only the four axes through `mv` are examined, reading at most
/// `WIN_LENGTH - 1` cells in each direction.
#[instrument(skip(board))]
pub fn check_win(board: &Board, mv: Move, color: Color) -> bool {
    AXES.iter()
        .any(|&(dr, dc)| run_length(board, mv, color, dr, dc) >= WIN_LENGTH)
}

/// Length of the same-color run through `mv` along one axis, capped at
/// `2 * (WIN_LENGTH - 1) + 1`.
pub fn run_length(board: &Board, mv: Move, color: Color, dr: isize, dc: isize) -> usize {
    1 + count_direction(board, mv, color, dr, dc) + count_direction(board, mv, color, -dr, -dc)
}

fn count_direction(board: &Board, mv: Move, color: Color, dr: isize, dc: isize) -> usize {
    let mut count = 0;
    for step in 1..WIN_LENGTH as isize {
        let (Some(row), Some(col)) = (
            mv.row.checked_add_signed(dr * step),
            mv.col.checked_add_signed(dc * step),
        ) else {
            break;
        };
        if board.get(Move::new(row, col)) == Some(Cell::Occupied(color)) {
            count += 1;
        } else {
            break;
        }
    }
    count
}
