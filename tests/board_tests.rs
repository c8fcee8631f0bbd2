//! Board tests - grid access, detection and clearing

use blockdoku::core::board::{Board, ClearedLines};
use blockdoku::types::BOARD_SIZE;

fn fill_row(board: &mut Board, row: i32) {
    for col in 0..BOARD_SIZE as i32 {
        board.set(row, col, true);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.size(), BOARD_SIZE);

    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            assert_eq!(board.get(row, col), Some(false), "({}, {})", row, col);
        }
    }
    assert!(board.is_empty());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_SIZE as i32, 0), None);
    assert_eq!(board.get(0, BOARD_SIZE as i32), None);
    assert!(board.is_out_of_bounds(9, 9));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();
    assert!(board.set(5, 7, true));
    assert_eq!(board.get(5, 7), Some(true));
    assert!(board.set(5, 7, false));
    assert_eq!(board.get(5, 7), Some(false));
    assert!(!board.set(-1, 0, true));
    assert!(!board.set(0, 9, true));
}

#[test]
fn test_row_clear_leaves_rest() {
    let mut board = Board::new();
    fill_row(&mut board, 0);
    board.set(3, 3, true);

    let cleared = ClearedLines::detect(&board);
    assert_eq!(cleared.rows.as_slice(), &[0]);
    assert!(cleared.columns.is_empty());
    assert!(cleared.squares.is_empty());

    assert_eq!(board.clear_lines(&cleared), 1);
    for col in 0..BOARD_SIZE as i32 {
        assert!(!board.is_filled(0, col));
    }
    assert!(board.is_filled(3, 3));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_column_and_box_detected_together() {
    let mut board = Board::new();
    for row in 0..BOARD_SIZE as i32 {
        board.set(row, 4, true);
    }
    for row in 6..9 {
        for col in 6..9 {
            board.set(row, col, true);
        }
    }

    let cleared = ClearedLines::detect(&board);
    assert_eq!(cleared.columns.as_slice(), &[4]);
    assert_eq!(cleared.squares.as_slice(), &[(2, 2)]);
    assert!(cleared.is_combo(2));

    assert_eq!(board.clear_lines(&cleared), 2);
    assert!(board.is_empty());
}

#[test]
fn test_overlapping_clears_count_per_category() {
    let mut board = Board::new();
    fill_row(&mut board, 0);
    for row in 0..BOARD_SIZE as i32 {
        board.set(row, 0, true);
    }
    for row in 0..3 {
        for col in 0..3 {
            board.set(row, col, true);
        }
    }

    let cleared = ClearedLines::detect(&board);
    // Row 0, column 0 and box (0,0) share cells but each counts once.
    assert_eq!(cleared.count(), 3);
    assert_eq!(cleared.category_count(), 3);
    assert_eq!(board.clear_lines(&cleared), 3);
    assert!(board.is_empty());
}

#[test]
fn test_detect_is_idempotent() {
    let mut board = Board::new();
    fill_row(&mut board, 2);
    fill_row(&mut board, 7);
    board.set(4, 4, true);

    let first = ClearedLines::detect(&board);
    let second = ClearedLines::detect(&board);
    assert_eq!(first, second);
    assert_eq!(first.rows.as_slice(), &[2, 7]);
}

#[test]
fn test_full_board_detects_everything_ascending() {
    let mut board = Board::new();
    for row in 0..BOARD_SIZE as i32 {
        fill_row(&mut board, row);
    }
    let cleared = ClearedLines::detect(&board);
    assert_eq!(cleared.rows.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(cleared.columns.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(cleared.squares.len(), 9);
    assert_eq!(cleared.squares[0], (0, 0));
    assert_eq!(cleared.squares[8], (2, 2));
    assert_eq!(cleared.count(), 27);
}

#[test]
fn test_no_completion_is_noop() {
    let mut board = Board::new();
    board.set(1, 1, true);
    let cleared = ClearedLines::detect(&board);
    assert!(cleared.is_empty());
    assert_eq!(board.clear_lines(&cleared), 0);
    assert!(board.is_filled(1, 1));
}
