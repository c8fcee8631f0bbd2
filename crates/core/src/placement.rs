//! Placement validator
//!
//! Checks a shape anchored at (row, col) against board bounds and occupancy,
//! and writes validated placements onto the board.

use std::fmt;

use crate::blocks::Shape;
use crate::board::Board;
use crate::types::{Position, BOARD_SIZE};

/// Why a placement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceError {
    /// Bounding box leaves the board
    OutOfBounds,
    /// An occupied cell of the block lands on a filled board cell
    Collision,
    /// The game has ended; only a new game accepts placements
    GameOver,
    /// The block is not in the current pool (already placed or never dealt)
    UnknownBlock,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds => "out_of_bounds",
            PlaceError::Collision => "collision",
            PlaceError::GameOver => "game_over",
            PlaceError::UnknownBlock => "unknown_block",
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds => "Out of bounds",
            PlaceError::Collision => "Collision detected",
            PlaceError::GameOver => "Game over",
            PlaceError::UnknownBlock => "Block not available",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for PlaceError {}

/// Check bounds, then occupancy, for `shape` anchored at `pos`.
///
/// The anchor must be a board cell and the whole bounding box must fit,
/// even where the shape has holes. A shape with no occupied cells passes
/// any in-bounds anchor.
pub fn check_placement(board: &Board, shape: &Shape, pos: Position) -> Result<(), PlaceError> {
    let n = BOARD_SIZE as i64;
    let (row, col) = (pos.row as i64, pos.col as i64);
    if row < 0
        || col < 0
        || row >= n
        || col >= n
        || row + shape.height() as i64 > n
        || col + shape.width() as i64 > n
    {
        return Err(PlaceError::OutOfBounds);
    }

    let collides = shape
        .offsets()
        .any(|(dr, dc)| board.is_filled(pos.row + dr as i32, pos.col + dc as i32));
    if collides {
        return Err(PlaceError::Collision);
    }

    Ok(())
}

pub fn can_place(board: &Board, shape: &Shape, pos: Position) -> bool {
    check_placement(board, shape, pos).is_ok()
}

/// Fill every occupied cell of `shape` at `pos`.
///
/// Validates first and leaves the board untouched on failure.
pub fn place(board: &mut Board, shape: &Shape, pos: Position) -> Result<(), PlaceError> {
    check_placement(board, shape, pos)?;
    for (dr, dc) in shape.offsets() {
        board.set(pos.row + dr as i32, pos.col + dc as i32, true);
    }
    Ok(())
}

/// Every in-bounds anchor where `shape` fits, row-major
pub fn valid_positions<'a>(
    board: &'a Board,
    shape: &'a Shape,
) -> impl Iterator<Item = Position> + 'a {
    (0..BOARD_SIZE as i32)
        .flat_map(|row| (0..BOARD_SIZE as i32).map(move |col| Position::new(row, col)))
        .filter(move |&pos| can_place(board, shape, pos))
}
