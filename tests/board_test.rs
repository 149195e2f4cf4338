//! Tests for board placement, reset and snapshots.

use gomoku_arena::{BOARD_SIZE, Board, Cell, Color, Move, PlaceError};

#[test]
fn test_place_fills_cell() {
    let mut board = Board::new();
    let mv = Move::new(7, 7);
    assert!(board.is_empty(mv));

    board.place(mv, Color::Black).expect("Place failed");

    assert!(!board.is_empty(mv));
    assert_eq!(board.get(mv), Some(Cell::Occupied(Color::Black)));
    assert_eq!(board.stone_count(), 1);
}

#[test]
fn test_occupied_cell_rejected_without_mutation() {
    let mut board = Board::new();
    let mv = Move::new(3, 4);
    board.place(mv, Color::Black).expect("Place failed");
    let before = board.clone();

    let err = board.place(mv, Color::White).unwrap_err();

    assert_eq!(err, PlaceError::CellOccupied(mv));
    assert_eq!(board, before);
    assert_eq!(board.get(mv), Some(Cell::Occupied(Color::Black)));
}

#[test]
fn test_out_of_bounds_rejected_without_mutation() {
    let mut board = Board::new();
    for mv in [Move::new(15, 0), Move::new(0, 15), Move::new(99, 99)] {
        let err = board.place(mv, Color::White).unwrap_err();
        assert_eq!(err, PlaceError::OutOfBounds(mv));
        assert!(!board.is_empty(mv), "Off-board cells are never empty");
        assert_eq!(board.get(mv), None);
    }
    assert_eq!(board.stone_count(), 0);
}

#[test]
fn test_reset_clears_board() {
    let mut board = Board::new();
    board.place(Move::new(0, 0), Color::Black).expect("Place failed");
    board.place(Move::new(14, 14), Color::White).expect("Place failed");

    board.reset();

    assert_eq!(board.stone_count(), 0);
    assert_eq!(board.empty_cells().len(), BOARD_SIZE * BOARD_SIZE);
}

#[test]
fn test_snapshot_is_independent() {
    let mut board = Board::new();
    board.place(Move::new(1, 1), Color::Black).expect("Place failed");
    let snapshot = board.snapshot();

    board.place(Move::new(2, 2), Color::White).expect("Place failed");

    assert_eq!(snapshot.get(Move::new(2, 2)), Some(Cell::Empty));
    assert_eq!(snapshot.stones(Color::Black), vec![Move::new(1, 1)]);
    assert!(snapshot.stones(Color::White).is_empty());
}

#[test]
fn test_full_board() {
    let mut board = Board::new();
    for (i, mv) in Board::new().empty_cells().into_iter().enumerate() {
        let color = if i % 2 == 0 { Color::Black } else { Color::White };
        board.place(mv, color).expect("Place failed");
    }
    assert!(board.is_full());
    assert!(board.empty_cells().is_empty());
}

#[test]
fn test_snapshot_display_marks_stones() {
    let mut board = Board::new();
    board.place(Move::new(0, 0), Color::Black).expect("Place failed");
    board.place(Move::new(0, 1), Color::White).expect("Place failed");

    let text = board.snapshot().display();
    assert!(text.contains('X'));
    assert!(text.contains('O'));
}
