//! Gomoku (five in a row) on a 15x15 board.

mod board;
pub mod rules;
mod session;
mod types;

pub use board::{Board, BoardSnapshot, PlaceError};
pub use rules::{WIN_LENGTH, check_win};
pub use session::{
    DEFAULT_RETRY_LIMIT, FORFEIT_REASON, GameSession, Proposal, RejectReason, RetryCounter,
    RetryPolicy, SessionError, TurnState, Verdict,
};
pub use types::{BOARD_SIZE, Cell, Color, GameResult, Move};
