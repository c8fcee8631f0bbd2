use std::fmt;

use crate::core::{BlockSupply, GameEngine, PlaceError, PlacementResult};
use crate::types::{Position, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    UnknownBlock { index: usize, available: usize },
    /// The engine no longer offers this block
    BlockUnavailable,
    OutOfBounds,
    Collision,
    GameOver,
}

impl CommandError {
    pub fn code(self) -> &'static str {
        match self {
            CommandError::UnknownBlock { .. } | CommandError::BlockUnavailable => "unknown_block",
            CommandError::OutOfBounds => "out_of_bounds",
            CommandError::Collision => "collision",
            CommandError::GameOver => "game_over",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            CommandError::UnknownBlock { .. } => "block index is not in the current pool",
            CommandError::BlockUnavailable => "Block not available",
            CommandError::OutOfBounds => "Out of bounds",
            CommandError::Collision => "Collision detected",
            CommandError::GameOver => "Game over",
        }
    }
}

impl From<PlaceError> for CommandError {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::OutOfBounds => CommandError::OutOfBounds,
            PlaceError::Collision => CommandError::Collision,
            PlaceError::GameOver => CommandError::GameOver,
            PlaceError::UnknownBlock => CommandError::BlockUnavailable,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownBlock { index, available } => write!(
                f,
                "block index {} is not in the current pool ({} available)",
                index, available
            ),
            other => f.write_str(other.message()),
        }
    }
}

impl std::error::Error for CommandError {}

/// Place the pool block at `block_index` with its top-left anchor at (row, col)
pub fn apply_place<S: BlockSupply>(
    engine: &mut GameEngine<S>,
    block_index: usize,
    row: i32,
    col: i32,
) -> Result<PlacementResult, CommandError> {
    apply_place_rotated(engine, block_index, None, row, col)
}

/// Like [`apply_place`], turning the block to `target_rot` first.
///
/// The block is turned clockwise from its current rotation to `target_rot`;
/// it keeps its id so it still leaves the pool once placed.
pub fn apply_place_rotated<S: BlockSupply>(
    engine: &mut GameEngine<S>,
    block_index: usize,
    target_rot: Option<Rotation>,
    row: i32,
    col: i32,
) -> Result<PlacementResult, CommandError> {
    if engine.is_game_over() {
        return Err(CommandError::GameOver);
    }

    let available = engine.current_blocks().len();
    let Some(block) = engine.current_blocks().get(block_index) else {
        return Err(CommandError::UnknownBlock {
            index: block_index,
            available,
        });
    };

    let mut block = block.clone();
    if let Some(target) = target_rot {
        let cw = (target.quarter_turns() + 4 - block.rotation().quarter_turns()) % 4;
        for _ in 0..cw {
            block = block.rotate_cw();
        }
    }

    Ok(engine.place_block(&block, Position::new(row, col))?)
}
