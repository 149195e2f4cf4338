//! Core domain types for gomoku.

use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_SIZE: usize = 15;

/// Stone color, which doubles as the player identity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Black (moves first).
    Black,
    /// White.
    White,
}

impl Color {
    /// Returns the opponent color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index into per-color arrays (Black = 0, White = 1).
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Stone of the given color.
    Occupied(Color),
}

/// A proposed placement, 0-indexed.
///
/// A `Move` is only a proposal: it may point outside the board or at an
/// occupied cell. [`Board::place`](super::Board::place) decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Move {
    /// Whether both coordinates fall within the board.
    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Outcome of a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Game is ongoing.
    InProgress,
    /// The color completed five in a row.
    Win(Color),
    /// The board filled up without a winner.
    Draw,
    /// The color lost by exceeding the invalid-move budget.
    Forfeit {
        /// Color that forfeited.
        color: Color,
        /// Human-readable reason.
        reason: String,
    },
    /// The session ended because the color's move source failed to communicate.
    Aborted {
        /// Color whose provider failed.
        color: Color,
        /// Error message from the provider.
        message: String,
    },
}

impl GameResult {
    /// Whether this result ends the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    /// Winning color, if any. A forfeit awards the game to the opponent.
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Win(color) => Some(*color),
            GameResult::Forfeit { color, .. } => Some(color.opponent()),
            _ => None,
        }
    }

    /// End-of-game notification text.
    pub fn announcement(&self) -> String {
        match self {
            GameResult::InProgress => "Game in progress".to_string(),
            GameResult::Win(color) => format!("{} wins with five in a row!", color),
            GameResult::Draw => "Draw: the board is full.".to_string(),
            GameResult::Forfeit { color, reason } => {
                format!("{} forfeits ({}). {} wins.", color, reason, color.opponent())
            }
            GameResult::Aborted { color, message } => {
                format!("Game aborted: {} could not be reached ({}).", color, message)
            }
        }
    }
}
