//! Prompt text sent to language-model players.

use crate::games::gomoku::{BOARD_SIZE, BoardSnapshot, Color, Move};
use tracing::instrument;

/// Builds the system and user prompts for one move request.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    think_limit_secs: Option<u32>,
}

impl PromptBuilder {
    /// Creates a prompt builder without a thinking-time hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the model to decide within the given number of seconds.
    pub fn with_think_limit(mut self, secs: u32) -> Self {
        self.think_limit_secs = Some(secs);
        self
    }

    /// System prompt describing the game.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are playing gomoku (five in a row) on a {size}x{size} board. \
             Five or more stones in a row horizontally, vertically or diagonally wins.",
            size = BOARD_SIZE
        )
    }

    /// User prompt describing the position and the answer format.
    #[instrument(skip(self, board))]
    pub fn user_prompt(&self, board: &BoardSnapshot, color: Color) -> String {
        let last = BOARD_SIZE - 1;
        let mut prompt = format!(
            "You play {color} ({symbol}). {first}\n\
             Coordinates are [row,col], both from 0 to {last}; [2,0] is the third row, first column.\n\
             Board ('.' empty, 'X' black, 'O' white):\n{board}\n",
            symbol = symbol(color),
            first = if color == Color::Black {
                "Black moves first."
            } else {
                "Black moved first."
            },
            board = board.display(),
        );
        prompt.push_str(&format!(
            "Black stones: {}\nWhite stones: {}\n",
            format_stones(&board.stones(Color::Black)),
            format_stones(&board.stones(Color::White)),
        ));
        prompt.push_str("You may only play on an empty cell.\n");
        if let Some(secs) = self.think_limit_secs {
            prompt.push_str(&format!("Decide within {} seconds.\n", secs));
        }
        prompt.push_str(
            "While thinking, write candidate cells in parentheses, e.g. (3,5). \
             Write your final choice exactly once in square brackets, e.g. [4,7].\n",
        );
        prompt
    }
}

fn symbol(color: Color) -> char {
    match color {
        Color::Black => 'X',
        Color::White => 'O',
    }
}

fn format_stones(stones: &[Move]) -> String {
    if stones.is_empty() {
        return "none".to_string();
    }
    stones
        .iter()
        .map(|mv| format!("({},{})", mv.row, mv.col))
        .collect::<Vec<_>>()
        .join(" ")
}
