//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the puzzle rules: the 9x9 board, block shapes,
//! placement validation, line/box clearing, scoring and the per-move
//! orchestration. It has no UI, networking or file I/O, so it is:
//!
//! - **Deterministic**: the same seed deals the same blocks
//! - **Testable**: every rule is covered by unit tests next to it
//! - **Portable**: runs headless, in a server session or under a UI
//!
//! # Module Structure
//!
//! - [`board`]: 9x9 grid plus completed row/column/box detection and clearing
//! - [`blocks`]: shape catalog, rotation and block instances
//! - [`placement`]: bounds and collision checks
//! - [`supply`]: the block pool trait and the seeded generator
//! - [`difficulty`]: immutable per-difficulty rule parameters
//! - [`scoring`]: placement/clear points, combos and compounding levels
//! - [`game_engine`]: one move as one transaction, hints, game over
//! - [`snapshot`]: owned copies of game state for callers and persistence
//! - [`rng`]: deterministic LCG
//!
//! # Game Rules
//!
//! - A block fits when its bounding box stays on the board and none of its
//!   occupied cells lands on a filled cell.
//! - After every placement all full rows, columns and 3x3 boxes are cleared
//!   at once. Nothing shifts.
//! - The game ends when no block in the pool fits anywhere.
//!
//! # Example
//!
//! ```
//! use blockdoku_core::{GameEngine, GameOptions};
//! use blockdoku_types::Position;
//!
//! let mut game = GameEngine::new(12345, GameOptions::default());
//!
//! let block = game.current_blocks()[0].clone();
//! let result = game.place_block(&block, Position::new(0, 0)).unwrap();
//!
//! assert_eq!(result.placement_points, block.cell_count() * 2);
//! assert_eq!(game.score(), result.points_gained);
//! ```

pub mod blocks;
pub mod board;
pub mod difficulty;
pub mod game_engine;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod supply;

pub use blockdoku_types as types;

// Re-export commonly used types for convenience
pub use blocks::{catalog_shape, Block, BlockId, Shape, ShapeError};
pub use board::{Board, ClearedLines};
pub use difficulty::{DifficultyConfig, GameOptions};
pub use game_engine::{
    GameEngine, GameOverResult, Hint, MoveEvent, PlacementResult, SimulatedMove,
};
pub use placement::{can_place, check_placement, PlaceError};
pub use rng::SimpleRng;
pub use scoring::{
    calculate_clear_score, calculate_level, calculate_placement_score, level_threshold,
    ClearScore, ScoreBreakdown, ScoringRules, ScoringSystem,
};
pub use snapshot::{GameSnapshot, GameStats, RestoreError};
pub use supply::{BlockGenerator, BlockSupply, GenerationConstraints};
