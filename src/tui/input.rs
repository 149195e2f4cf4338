//! Cursor movement for keyboard navigation.

use crate::games::gomoku::{BOARD_SIZE, Move};
use crossterm::event::KeyCode;

/// Moves cursor based on arrow keys, stopping at the board edge.
pub fn move_cursor(cursor: Move, key: KeyCode) -> Move {
    let last = BOARD_SIZE - 1;
    match key {
        KeyCode::Up => Move::new(cursor.row.saturating_sub(1), cursor.col),
        KeyCode::Down => Move::new((cursor.row + 1).min(last), cursor.col),
        KeyCode::Left => Move::new(cursor.row, cursor.col.saturating_sub(1)),
        KeyCode::Right => Move::new(cursor.row, (cursor.col + 1).min(last)),
        _ => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_move_one_cell() {
        let start = Move::new(7, 7);
        assert_eq!(move_cursor(start, KeyCode::Up), Move::new(6, 7));
        assert_eq!(move_cursor(start, KeyCode::Down), Move::new(8, 7));
        assert_eq!(move_cursor(start, KeyCode::Left), Move::new(7, 6));
        assert_eq!(move_cursor(start, KeyCode::Right), Move::new(7, 8));
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        let corner = Move::new(0, 0);
        assert_eq!(move_cursor(corner, KeyCode::Up), corner);
        assert_eq!(move_cursor(corner, KeyCode::Left), corner);

        let far = Move::new(14, 14);
        assert_eq!(move_cursor(far, KeyCode::Down), far);
        assert_eq!(move_cursor(far, KeyCode::Right), far);
    }

    #[test]
    fn test_other_keys_ignored() {
        let start = Move::new(3, 4);
        assert_eq!(move_cursor(start, KeyCode::Char('x')), start);
    }
}
