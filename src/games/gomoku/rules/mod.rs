//! Game rules for gomoku.
//!
//! Pure functions over a [`Board`](super::Board). A game ends when a
//! placed stone completes five or more in a row; a full board without
//! such a run is a draw.

pub mod win;

pub use win::{WIN_LENGTH, check_win};
