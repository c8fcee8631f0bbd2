//! Owned game-state copies and restore validation errors

use std::fmt;

use crate::blocks::Block;
use crate::scoring::ScoreBreakdown;
use crate::types::{Difficulty, BOARD_SIZE};

/// Derived counters carried alongside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    pub lines_cleared: u32,
    pub squares_cleared: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub breakdown: ScoreBreakdown,
    pub points_to_next_level: u32,
}

/// Owned copy of a game's state. Editing it never touches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_SIZE]; BOARD_SIZE],
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub move_count: u32,
    pub episode_id: u32,
    pub difficulty: Difficulty,
    pub hints_enabled: bool,
    pub stats: GameStats,
    pub blocks: Vec<Block>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        let blocks = std::mem::take(&mut self.blocks);
        *self = Self {
            blocks,
            ..Self::default()
        };
        self.blocks.clear();
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }

    pub fn filled_cells(&self) -> usize {
        self.board
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell != 0)
            .count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_SIZE]; BOARD_SIZE],
            score: 0,
            level: 1,
            game_over: false,
            move_count: 0,
            episode_id: 0,
            difficulty: Difficulty::default(),
            hints_enabled: true,
            stats: GameStats::default(),
            blocks: Vec::new(),
        }
    }
}

/// Rejected snapshot on restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreError {
    InvalidCell { row: usize, col: usize, value: u8 },
    InvalidLevel(u32),
    DuplicateBlockId(u32),
    ComboExceedsMax { combo: u32, max_combo: u32 },
}

impl RestoreError {
    pub fn code(self) -> &'static str {
        match self {
            RestoreError::InvalidCell { .. } => "invalid_cell",
            RestoreError::InvalidLevel(_) => "invalid_level",
            RestoreError::DuplicateBlockId(_) => "duplicate_block",
            RestoreError::ComboExceedsMax { .. } => "invalid_combo",
        }
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::InvalidCell { row, col, value } => {
                write!(f, "cell ({}, {}) holds {}, expected 0 or 1", row, col, value)
            }
            RestoreError::InvalidLevel(level) => write!(f, "level {} is out of range", level),
            RestoreError::DuplicateBlockId(id) => write!(f, "block id {} appears twice", id),
            RestoreError::ComboExceedsMax { combo, max_combo } => {
                write!(f, "combo {} exceeds max combo {}", combo, max_combo)
            }
        }
    }
}

impl std::error::Error for RestoreError {}
