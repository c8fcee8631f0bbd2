//! Game engine - one move is one transaction
//!
//! `place_block` runs validate -> place -> placement points -> detect ->
//! clear -> clear score -> level -> pool removal -> game-over check and
//! returns everything the caller needs to present the move. A rejected
//! placement changes nothing.

use tracing::{debug, info, instrument};

use crate::blocks::{Block, BlockId};
use crate::board::{Board, ClearedLines};
use crate::difficulty::{DifficultyConfig, GameOptions};
use crate::placement::{self, PlaceError};
use crate::scoring::{ClearScore, ScoringSystem};
use crate::snapshot::{GameSnapshot, GameStats, RestoreError};
use crate::supply::{BlockGenerator, BlockSupply};
use crate::types::{Difficulty, Position, Rotation, BOARD_SIZE, DEFAULT_BLOCK_COUNT};

/// Outcome of a game-over check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOverResult {
    pub is_game_over: bool,
    /// Captured when the game ended
    pub final_score: Option<u32>,
    pub final_level: Option<u32>,
}

impl GameOverResult {
    fn running() -> Self {
        Self::default()
    }

    fn ended(score: u32, level: u32) -> Self {
        Self {
            is_game_over: true,
            final_score: Some(score),
            final_level: Some(level),
        }
    }
}

/// Everything produced by one accepted placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    pub block_id: BlockId,
    pub position: Position,
    /// Placement plus clear points
    pub points_gained: u32,
    pub placement_points: u32,
    pub clear: ClearScore,
    pub cleared: ClearedLines,
    /// Rows + columns + boxes cleared
    pub cleared_count: usize,
    pub combo: u32,
    pub level_up: bool,
    pub game_over: GameOverResult,
    pub snapshot: GameSnapshot,
}

/// Scoring preview of a placement (no state change)
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMove {
    pub placement_points: u32,
    pub clear: ClearScore,
    pub cleared: ClearedLines,
    pub total: u32,
}

/// Best placement found by exhaustive search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub block_id: BlockId,
    /// Index into the current pool
    pub block_index: usize,
    pub position: Position,
    pub expected_score: u32,
}

/// Compact record of the last accepted move, for observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    pub episode_id: u32,
    pub move_index: u32,
    pub block_id: BlockId,
    pub position: Position,
    pub points_gained: u32,
    pub cleared_count: usize,
    pub combo: u32,
    pub game_over: bool,
}

/// Owns the board, scoring state and block supply of one game
#[derive(Debug, Clone)]
pub struct GameEngine<S: BlockSupply = BlockGenerator> {
    board: Board,
    scoring: ScoringSystem,
    supply: S,
    config: DifficultyConfig,
    hints_enabled: bool,
    move_count: u32,
    game_over: bool,
    /// Monotonic episode id (increments on new game)
    episode_id: u32,
    last_event: Option<MoveEvent>,
}

impl GameEngine<BlockGenerator> {
    /// Engine with the default seeded generator.
    ///
    /// `options.seed`, when set, takes precedence over `seed`.
    pub fn new(seed: u32, options: GameOptions) -> Self {
        Self::with_supply(BlockGenerator::new(options.seed.unwrap_or(seed)), options)
    }
}

impl Default for GameEngine<BlockGenerator> {
    fn default() -> Self {
        Self::new(1, GameOptions::default())
    }
}

impl<S: BlockSupply> GameEngine<S> {
    /// Engine around a caller-provided supply; an empty pool is filled.
    pub fn with_supply(mut supply: S, options: GameOptions) -> Self {
        let config = DifficultyConfig::for_difficulty(options.difficulty);
        if let Some(seed) = options.seed {
            supply.reseed(seed);
        }
        let mut engine = Self {
            board: Board::new(),
            scoring: ScoringSystem::default(),
            supply,
            config,
            hints_enabled: options.hints_for(&config),
            move_count: 0,
            game_over: false,
            episode_id: 0,
            last_event: None,
        };
        if engine.supply.current_blocks().is_empty() {
            engine.refill_blocks();
        }
        engine
    }

    /// Reset everything and deal a fresh pool
    pub fn new_game(&mut self, options: GameOptions) {
        self.config = DifficultyConfig::for_difficulty(options.difficulty);
        self.hints_enabled = options.hints_for(&self.config);
        self.board.clear();
        self.scoring.reset();
        self.move_count = 0;
        self.game_over = false;
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        if let Some(seed) = options.seed {
            self.supply.reseed(seed);
        }
        self.refill_blocks();
        info!(
            episode = self.episode_id,
            difficulty = self.config.difficulty.as_str(),
            hints = self.hints_enabled,
            "new game"
        );
    }

    fn refill_blocks(&mut self) {
        let constraints = self.config.constraints();
        self.supply
            .generate_new_blocks(DEFAULT_BLOCK_COUNT, &constraints);
        debug!(
            count = self.supply.current_blocks().len(),
            "generated block supply"
        );
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_blocks(&self) -> &[Block] {
        self.supply.current_blocks()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.current_blocks().iter().find(|b| b.id() == id)
    }

    pub fn scoring(&self) -> &ScoringSystem {
        &self.scoring
    }

    pub fn supply(&self) -> &S {
        &self.supply
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn combo(&self) -> u32 {
        self.scoring.combo()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn hints_enabled(&self) -> bool {
        self.hints_enabled
    }

    pub fn set_hints_enabled(&mut self, enabled: bool) {
        self.hints_enabled = enabled;
    }

    /// Check a placement without applying it.
    ///
    /// Only blocks in the current pool are accepted, turned or not.
    pub fn validate_placement(&self, block: &Block, pos: Position) -> Result<(), PlaceError> {
        if self.game_over {
            return Err(PlaceError::GameOver);
        }
        if !self.is_offered(block) {
            return Err(PlaceError::UnknownBlock);
        }
        placement::check_placement(&self.board, block.shape(), pos)
    }

    fn is_offered(&self, block: &Block) -> bool {
        self.current_blocks().iter().any(|pooled| {
            pooled.id() == block.id()
                && Rotation::ALL
                    .iter()
                    .any(|&r| pooled.shape().rotated(r) == *block.shape())
        })
    }

    /// Place `block` with its top-left anchor at `pos`.
    ///
    /// On error nothing changes. On success the block leaves the pool, an
    /// emptied pool is refilled, and game over is re-checked.
    #[instrument(level = "debug", skip(self, block), fields(block = block.id().0))]
    pub fn place_block(&mut self, block: &Block, pos: Position) -> Result<PlacementResult, PlaceError> {
        self.validate_placement(block, pos)?;

        let level_before = self.scoring.level();
        placement::place(&mut self.board, block.shape(), pos)?;
        let placement_points = self.scoring.apply_placement(block.cell_count());

        let cleared = ClearedLines::detect(&self.board);
        let cleared_count = self.board.clear_lines(&cleared);
        let clear = self.scoring.apply_clear(&cleared, &self.config);

        self.supply.remove_block(block.id());
        self.move_count += 1;
        if self.supply.current_blocks().is_empty() {
            self.refill_blocks();
        }

        let game_over = self.check_game_over();
        let points_gained = placement_points.saturating_add(clear.total);
        let combo = self.scoring.combo();

        debug!(
            row = pos.row,
            col = pos.col,
            placement_points,
            clear_points = clear.total,
            cleared = cleared_count,
            combo,
            score = self.scoring.score(),
            "block placed"
        );

        self.last_event = Some(MoveEvent {
            episode_id: self.episode_id,
            move_index: self.move_count,
            block_id: block.id(),
            position: pos,
            points_gained,
            cleared_count,
            combo,
            game_over: game_over.is_game_over,
        });

        Ok(PlacementResult {
            block_id: block.id(),
            position: pos,
            points_gained,
            placement_points,
            clear,
            cleared,
            cleared_count,
            combo,
            level_up: self.scoring.level() > level_before,
            game_over,
            snapshot: self.snapshot(),
        })
    }

    /// Whether any pooled block fits anywhere
    pub fn has_valid_move(&self) -> bool {
        self.current_blocks()
            .iter()
            .any(|block| placement::valid_positions(&self.board, block.shape()).next().is_some())
    }

    /// Decide whether the game has ended.
    ///
    /// An empty pool is not game over: it is refilled and play continues.
    pub fn check_game_over(&mut self) -> GameOverResult {
        if self.game_over {
            return GameOverResult::ended(self.scoring.score(), self.scoring.level());
        }
        if self.supply.current_blocks().is_empty() {
            self.refill_blocks();
            return GameOverResult::running();
        }
        if self.has_valid_move() {
            return GameOverResult::running();
        }

        self.game_over = true;
        info!(
            episode = self.episode_id,
            score = self.scoring.score(),
            level = self.scoring.level(),
            moves = self.move_count,
            "game over"
        );
        GameOverResult::ended(self.scoring.score(), self.scoring.level())
    }

    /// Score a placement as if it were made now, without changing state
    pub fn simulate_placement(&self, block: &Block, pos: Position) -> Result<SimulatedMove, PlaceError> {
        self.validate_placement(block, pos)?;

        let mut board = self.board.clone();
        placement::place(&mut board, block.shape(), pos)?;
        let placement_points = self.scoring.placement_points(block.cell_count());
        let cleared = ClearedLines::detect(&board);
        let clear = self.scoring.clear_points(&cleared, &self.config);

        Ok(SimulatedMove {
            placement_points,
            total: placement_points.saturating_add(clear.total),
            clear,
            cleared,
        })
    }

    /// Best move for the player; None when hints are off
    pub fn hint(&self) -> Option<Hint> {
        if !self.hints_enabled {
            return None;
        }
        self.best_move()
    }

    /// Exhaustive search over every pooled block and anchor.
    ///
    /// Ties keep the first found (pool order, then row-major).
    pub fn best_move(&self) -> Option<Hint> {
        if self.game_over {
            return None;
        }

        let mut best: Option<Hint> = None;
        for (block_index, block) in self.current_blocks().iter().enumerate() {
            for position in placement::valid_positions(&self.board, block.shape()) {
                let Ok(sim) = self.simulate_placement(block, position) else {
                    continue;
                };
                if best.map_or(true, |b| sim.total > b.expected_score) {
                    best = Some(Hint {
                        block_id: block.id(),
                        block_index,
                        position,
                        expected_score: sim.total,
                    });
                }
            }
        }
        best
    }

    pub fn last_event(&self) -> Option<&MoveEvent> {
        self.last_event.as_ref()
    }

    pub fn take_last_event(&mut self) -> Option<MoveEvent> {
        self.last_event.take()
    }

    /// Fill `out` with an owned copy of the current state, reusing its allocation
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.score = self.scoring.score();
        out.level = self.scoring.level();
        out.game_over = self.game_over;
        out.move_count = self.move_count;
        out.episode_id = self.episode_id;
        out.difficulty = self.config.difficulty;
        out.hints_enabled = self.hints_enabled;
        out.stats = GameStats {
            lines_cleared: self.scoring.lines_cleared(),
            squares_cleared: self.scoring.squares_cleared(),
            combo: self.scoring.combo(),
            max_combo: self.scoring.max_combo(),
            breakdown: self.scoring.breakdown(),
            points_to_next_level: self.scoring.points_to_next_level(),
        };
        out.blocks.clear();
        out.blocks.extend(self.current_blocks().iter().cloned());
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Replace the whole state with `snap`.
    ///
    /// The snapshot is validated first; on error the engine is unchanged.
    pub fn restore(&mut self, snap: &GameSnapshot) -> Result<(), RestoreError> {
        let board = Board::from_grid(&snap.board)
            .map_err(|(row, col, value)| RestoreError::InvalidCell { row, col, value })?;

        let max_level = self.scoring.rules().max_level;
        if snap.level == 0 || snap.level > max_level {
            return Err(RestoreError::InvalidLevel(snap.level));
        }
        if snap.stats.combo > snap.stats.max_combo {
            return Err(RestoreError::ComboExceedsMax {
                combo: snap.stats.combo,
                max_combo: snap.stats.max_combo,
            });
        }
        for (i, block) in snap.blocks.iter().enumerate() {
            if snap.blocks[..i].iter().any(|other| other.id() == block.id()) {
                return Err(RestoreError::DuplicateBlockId(block.id().0));
            }
        }

        self.board = board;
        self.config = DifficultyConfig::for_difficulty(snap.difficulty);
        self.hints_enabled = snap.hints_enabled;
        self.scoring.restore(
            snap.score,
            snap.level,
            snap.stats.lines_cleared,
            snap.stats.squares_cleared,
            snap.stats.combo,
            snap.stats.max_combo,
            snap.stats.breakdown,
        );
        self.supply.replace_blocks(snap.blocks.clone());
        self.move_count = snap.move_count;
        self.episode_id = snap.episode_id;
        self.game_over = snap.game_over;
        self.last_event = None;

        if !self.game_over && self.supply.current_blocks().is_empty() {
            self.refill_blocks();
        }
        info!(
            episode = self.episode_id,
            score = self.scoring.score(),
            moves = self.move_count,
            "game restored"
        );
        Ok(())
    }

    /// Cells still empty
    pub fn empty_cells(&self) -> usize {
        BOARD_SIZE * BOARD_SIZE - self.board.filled_count()
    }
}
