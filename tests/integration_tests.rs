//! Integration tests for whole moves through the game engine

use blockdoku::core::{
    Block, BlockId, BlockSupply, GameEngine, GameOptions, GenerationConstraints, PlaceError,
};
use blockdoku::types::{BlockTag, Difficulty, Position, Rotation, ShapeKind, BOARD_SIZE};

/// Pool that only holds what the test puts in; refills with single cells
#[derive(Debug, Default)]
struct ScriptedSupply {
    blocks: Vec<Block>,
    next_id: u32,
}

impl BlockSupply for ScriptedSupply {
    fn current_blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let idx = self.blocks.iter().position(|b| b.id() == id)?;
        Some(self.blocks.remove(idx))
    }

    fn generate_new_blocks(&mut self, count: usize, _constraints: &GenerationConstraints) {
        self.blocks = (0..count)
            .map(|_| {
                self.next_id += 1;
                block(500 + self.next_id, ShapeKind::Single, Rotation::Deg0)
            })
            .collect();
    }

    fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }
}

fn block(id: u32, kind: ShapeKind, rotation: Rotation) -> Block {
    Block::new(BlockId(id), kind, rotation, BlockTag::Standard)
}

fn engine(blocks: Vec<Block>, filled: &[(usize, usize)]) -> GameEngine<ScriptedSupply> {
    let supply = ScriptedSupply {
        blocks,
        next_id: 0,
    };
    let mut engine = GameEngine::with_supply(supply, GameOptions::default());
    if !filled.is_empty() {
        let mut snap = engine.snapshot();
        for &(r, c) in filled {
            snap.board[r][c] = 1;
        }
        engine.restore(&snap).unwrap();
    }
    engine
}

fn row_cells(row: usize, cols: std::ops::Range<usize>) -> Vec<(usize, usize)> {
    cols.map(|c| (row, c)).collect()
}

#[test]
fn test_single_block_placement() {
    let single = block(1, ShapeKind::Single, Rotation::Deg0);
    let mut game = engine(vec![single.clone(), block(2, ShapeKind::Single, Rotation::Deg0)], &[]);

    let result = game.place_block(&single, Position::new(4, 4)).unwrap();
    assert_eq!(game.snapshot().board[4][4], 1);
    assert_eq!(result.placement_points, 2);
    assert!(result.cleared.is_empty());
    assert_eq!(game.combo(), 0);
    assert_eq!(game.score(), 2);
}

#[test]
fn test_row_completion() {
    let single = block(1, ShapeKind::Single, Rotation::Deg0);
    let mut game = engine(
        vec![single.clone(), block(2, ShapeKind::Single, Rotation::Deg0)],
        &row_cells(0, 0..8),
    );

    let result = game.place_block(&single, Position::new(0, 8)).unwrap();
    assert_eq!(result.cleared.rows.as_slice(), &[0]);
    assert_eq!(result.clear.total, 15);
    assert_eq!(result.clear.combo_bonus, 0);
    assert_eq!(result.placement_points, 2);
    assert_eq!(result.points_gained, 2 + 15 * result.clear.level);
    assert_eq!(game.snapshot().board[0], [0u8; BOARD_SIZE]);
}

#[test]
fn test_double_row_clear_is_combo() {
    let vertical = block(1, ShapeKind::Domino, Rotation::Deg90);
    let mut filled = row_cells(0, 0..8);
    filled.extend(row_cells(1, 0..8));
    let mut game = engine(
        vec![vertical.clone(), block(2, ShapeKind::Single, Rotation::Deg0)],
        &filled,
    );

    let result = game.place_block(&vertical, Position::new(0, 8)).unwrap();
    assert_eq!(result.cleared.rows.as_slice(), &[0, 1]);
    assert!(result.clear.is_combo);
    assert_eq!(result.clear.combo_bonus, 20);
    assert_eq!(result.clear.total, 30 + 20);
    assert_eq!(game.combo(), 1);
}

#[test]
fn test_no_clear_move_resets_combo() {
    let vertical = block(1, ShapeKind::Domino, Rotation::Deg90);
    let single = block(2, ShapeKind::Single, Rotation::Deg0);
    let mut filled = row_cells(0, 0..8);
    filled.extend(row_cells(1, 0..8));
    let mut game = engine(
        vec![vertical.clone(), single.clone(), block(3, ShapeKind::Single, Rotation::Deg0)],
        &filled,
    );

    game.place_block(&vertical, Position::new(0, 8)).unwrap();
    assert_eq!(game.combo(), 1);

    game.place_block(&single, Position::new(6, 6)).unwrap();
    assert_eq!(game.combo(), 0);
    assert_eq!(game.scoring().max_combo(), 1);
}

#[test]
fn test_game_over_detection() {
    // Only row 8 has room, and only for a single cell at a time.
    let filled: Vec<_> = (0..BOARD_SIZE)
        .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| !(r == 8 && c % 2 == 0))
        .collect();
    let domino = block(1, ShapeKind::Domino, Rotation::Deg0);
    let mut game = engine(vec![domino.clone()], &filled);

    let result = game.check_game_over();
    assert!(result.is_game_over);
    assert_eq!(result.final_score, Some(0));
    assert_eq!(result.final_level, Some(1));

    assert_eq!(
        game.place_block(&domino, Position::new(8, 0)),
        Err(PlaceError::GameOver)
    );
    assert!(game.hint().is_none());

    game.new_game(GameOptions::default());
    assert!(!game.is_game_over());
    assert!(game.board().is_empty());
}

#[test]
fn test_invalid_placement_reports_reason() {
    let line = block(1, ShapeKind::Line5, Rotation::Deg0);
    let mut game = engine(vec![line.clone()], &[(4, 4)]);

    let err = game.place_block(&line, Position::new(0, 5)).unwrap_err();
    assert_eq!(err.reason(), "Out of bounds");
    let err = game.place_block(&line, Position::new(4, 0)).unwrap_err();
    assert_eq!(err.reason(), "Collision detected");
    assert_eq!(game.move_count(), 0);
    assert_eq!(game.current_blocks().len(), 1);
}

#[test]
fn test_snapshot_is_an_owned_copy() {
    let single = block(1, ShapeKind::Single, Rotation::Deg0);
    let mut game = engine(vec![single.clone(), block(2, ShapeKind::Single, Rotation::Deg0)], &[]);

    let mut snap = game.snapshot();
    snap.board[0][0] = 1;
    snap.blocks.clear();
    assert!(!game.board().is_filled(0, 0));
    assert_eq!(game.current_blocks().len(), 2);

    let before = game.snapshot();
    game.place_block(&single, Position::new(0, 0)).unwrap();
    assert_eq!(before.board[0][0], 0);
    assert_eq!(before.move_count, 0);
}

#[test]
fn test_score_and_level_monotonic_over_a_game() {
    let mut game = GameEngine::new(2024, GameOptions::new(Difficulty::Easy));
    let mut last_score = 0;
    let mut last_level = 1;
    for _ in 0..300 {
        let Some(hint) = game.best_move() else { break };
        let block = game.current_blocks()[hint.block_index].clone();
        let result = game.place_block(&block, hint.position).unwrap();
        assert_eq!(result.points_gained, hint.expected_score);
        assert!(game.score() >= last_score);
        assert!(game.level() >= last_level);
        last_score = game.score();
        last_level = game.level();
    }
}

#[test]
fn test_difficulty_multiplier_applies_to_clears_only() {
    let single = block(1, ShapeKind::Single, Rotation::Deg0);
    let supply = ScriptedSupply {
        blocks: vec![single.clone(), block(2, ShapeKind::Single, Rotation::Deg0)],
        next_id: 0,
    };
    let mut game = GameEngine::with_supply(supply, GameOptions::new(Difficulty::Expert));
    let mut snap = game.snapshot();
    for c in 0..8 {
        snap.board[3][c] = 1;
    }
    game.restore(&snap).unwrap();

    let result = game.place_block(&single, Position::new(3, 8)).unwrap();
    assert_eq!(result.placement_points, 2);
    // 15 * level 1 * 2.0
    assert_eq!(result.clear.total, 30);
}

#[test]
fn test_expert_needs_three_rows_for_line_combo() {
    let vertical = block(1, ShapeKind::Domino, Rotation::Deg90);
    let supply = ScriptedSupply {
        blocks: vec![vertical.clone(), block(2, ShapeKind::Single, Rotation::Deg0)],
        next_id: 0,
    };
    let mut game = GameEngine::with_supply(supply, GameOptions::new(Difficulty::Expert));
    let mut snap = game.snapshot();
    for r in 4..6 {
        for c in 0..8 {
            snap.board[r][c] = 1;
        }
    }
    game.restore(&snap).unwrap();

    let result = game.place_block(&vertical, Position::new(4, 8)).unwrap();
    assert_eq!(result.cleared.rows.as_slice(), &[4, 5]);
    assert!(!result.clear.is_combo);
    assert_eq!(game.combo(), 0);
}
