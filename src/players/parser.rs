//! Extracts a move from free-form model output.

use crate::games::gomoku::Move;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Finds the authoritative `[row,col]` pair in a response.
///
/// Accepted forms are `[r,c]`, `[r, c]` and `[(r,c)]`, each number being
/// one or two ASCII digits. When several pairs appear, the last one wins;
/// parenthesised pairs outside brackets (`(3,5)`) are treated as thinking
/// aloud and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateParser {
    final_answer_marker: Option<String>,
}

impl CoordinateParser {
    /// Parser that searches the whole response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that only searches the text after the last `marker`, when the
    /// marker is present.
    pub fn with_final_answer_marker(marker: impl Into<String>) -> Self {
        Self {
            final_answer_marker: Some(marker.into()),
        }
    }

    /// Configured final-answer marker.
    pub fn final_answer_marker(&self) -> Option<&str> {
        self.final_answer_marker.as_deref()
    }

    /// Parses the fully concatenated response text.
    ///
    /// Returns `None` when no bracketed pair is found. Coordinates are not
    /// range-checked here.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn parse(&self, text: &str) -> Option<Move> {
        let searched = match self.final_answer_marker.as_deref() {
            Some(marker) if !marker.is_empty() => text
                .rfind(marker)
                .map_or(text, |idx| &text[idx + marker.len()..]),
            _ => text,
        };

        let bytes = searched.as_bytes();
        let found = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'[')
            .filter_map(|(idx, _)| parse_bracketed(&bytes[idx + 1..]))
            .last();

        debug!(?found, "Parsed response");
        found
    }
}

/// Parses the text following an opening bracket.
fn parse_bracketed(bytes: &[u8]) -> Option<Move> {
    let mut cursor = Cursor { bytes, pos: 0 };
    cursor.skip_whitespace();
    cursor.eat(b'(');
    cursor.skip_whitespace();
    let row = cursor.number()?;
    cursor.skip_whitespace();
    if !cursor.eat(b',') {
        return None;
    }
    cursor.skip_whitespace();
    let col = cursor.number()?;
    cursor.skip_whitespace();
    cursor.eat(b')');
    cursor.skip_whitespace();
    cursor.eat(b']').then(|| Move::new(row, col))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// One or two digits; a third digit rejects the pair.
    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.bytes[start..self.pos];
        if digits.is_empty() || digits.len() > 2 {
            return None;
        }
        Some(
            digits
                .iter()
                .fold(0, |acc, d| acc * 10 + usize::from(d - b'0')),
        )
    }
}
