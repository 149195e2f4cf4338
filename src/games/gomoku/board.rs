//! Gomoku board: a fixed 15x15 grid of cells.

use super::types::{BOARD_SIZE, Cell, Color, Move};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Errors that can occur when placing a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// Row or column is outside `0..BOARD_SIZE`.
    #[display("{_0} is off the board (coordinates run 0-14)")]
    OutOfBounds(#[error(not(source))] Move),
    /// Target cell already holds a stone.
    #[display("{_0} is already occupied")]
    CellOccupied(#[error(not(source))] Move),
}

/// The playing grid.
///
/// Only the turn coordinator mutates a board; everyone else reads a
/// [`BoardSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    stones: usize,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            stones: 0,
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Gets the cell at the given position, `None` if off the board.
    pub fn get(&self, mv: Move) -> Option<Cell> {
        self.cells.get(mv.row).and_then(|row| row.get(mv.col)).copied()
    }

    /// Checks if a cell is empty. Off-board positions are never empty.
    pub fn is_empty(&self, mv: Move) -> bool {
        matches!(self.get(mv), Some(Cell::Empty))
    }

    /// Places a stone.
    ///
    /// On error the board is left untouched.
    #[instrument(skip(self), fields(stones = self.stones))]
    pub fn place(&mut self, mv: Move, color: Color) -> Result<(), PlaceError> {
        if !mv.in_bounds() {
            return Err(PlaceError::OutOfBounds(mv));
        }
        let cell = &mut self.cells[mv.row][mv.col];
        if *cell != Cell::Empty {
            return Err(PlaceError::CellOccupied(mv));
        }
        *cell = Cell::Occupied(color);
        self.stones += 1;
        Ok(())
    }

    /// Clears every cell.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        self.stones = 0;
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.stones
    }

    /// Whether no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.stones == BOARD_SIZE * BOARD_SIZE
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Move> {
        self.snapshot().empty_cells()
    }

    /// Independently owned copy of the grid.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot { cells: self.cells }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable, serializable view of a board at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl BoardSnapshot {
    /// Side length of the board.
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Gets the cell at the given position, `None` if off the board.
    pub fn get(&self, mv: Move) -> Option<Cell> {
        self.cells.get(mv.row).and_then(|row| row.get(mv.col)).copied()
    }

    /// Rows of cells.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Positions of all stones of one color, row-major.
    pub fn stones(&self, color: Color) -> Vec<Move> {
        self.positions(|cell| cell == Cell::Occupied(color))
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Move> {
        self.positions(|cell| cell == Cell::Empty)
    }

    fn positions(&self, keep: impl Fn(Cell) -> bool) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| keep(**cell))
                    .map(move |(col, _)| Move::new(row, col))
            })
            .collect()
    }

    /// Formats the board as text with row and column axes.
    ///
    /// `.` is empty, `X` is black, `O` is white.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!("{:>3}", col));
        }
        result.push('\n');
        for (row, cells) in self.cells.iter().enumerate() {
            result.push_str(&format!("{:>3}", row));
            for cell in cells {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Color::Black) => 'X',
                    Cell::Occupied(Color::White) => 'O',
                };
                result.push_str("  ");
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Board::new().snapshot()
    }
}
