//! Headless player: always takes the highest scoring move.

use tracing::{debug, info};

use crate::core::{BlockSupply, GameEngine};

/// Summary of one autoplayed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoplayReport {
    pub moves: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub max_combo: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoplayer {
    max_moves: u32,
}

impl Autoplayer {
    pub const DEFAULT_MAX_MOVES: u32 = 10_000;

    pub fn new(max_moves: u32) -> Self {
        Self { max_moves }
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    /// Play until game over or the move cap.
    ///
    /// Searches even when hints are disabled for the human player.
    pub fn run<S: BlockSupply>(&self, engine: &mut GameEngine<S>) -> AutoplayReport {
        let mut moves = 0;
        let mut stalled = false;
        while moves < self.max_moves && !engine.is_game_over() {
            let Some(hint) = engine.best_move() else {
                // One refill attempt; a supply that stays empty ends the run.
                if engine.check_game_over().is_game_over || stalled {
                    break;
                }
                stalled = true;
                continue;
            };
            stalled = false;
            let Some(block) = engine.current_blocks().get(hint.block_index).cloned() else {
                break;
            };
            match engine.place_block(&block, hint.position) {
                Ok(result) => {
                    moves += 1;
                    debug!(
                        moves,
                        points = result.points_gained,
                        cleared = result.cleared_count,
                        "autoplay move"
                    );
                }
                Err(err) => {
                    debug!(%err, "autoplay move rejected");
                    break;
                }
            }
        }

        let report = self.report(engine, moves);
        info!(
            moves = report.moves,
            score = report.score,
            level = report.level,
            game_over = report.game_over,
            "autoplay finished"
        );
        report
    }

    fn report<S: BlockSupply>(&self, engine: &GameEngine<S>, moves: u32) -> AutoplayReport {
        let scoring = engine.scoring();
        AutoplayReport {
            moves,
            score: scoring.score(),
            level: scoring.level(),
            lines: scoring.lines_cleared(),
            max_combo: scoring.max_combo(),
            game_over: engine.is_game_over(),
        }
    }
}

impl Default for Autoplayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_MOVES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameOptions;
    use crate::types::Difficulty;

    #[test]
    fn autoplay_respects_move_cap() {
        let mut engine = GameEngine::new(42, GameOptions::default());
        let report = Autoplayer::new(10).run(&mut engine);
        assert!(report.moves <= 10);
        assert_eq!(report.moves, engine.move_count());
        assert_eq!(report.score, engine.score());
    }

    #[test]
    fn autoplay_is_deterministic() {
        let options = GameOptions::new(Difficulty::Hard);
        let mut a = GameEngine::new(7, options);
        let mut b = GameEngine::new(7, options);
        let player = Autoplayer::new(200);
        assert_eq!(player.run(&mut a), player.run(&mut b));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn autoplay_ignores_hint_setting() {
        let mut engine = GameEngine::new(3, GameOptions::default().with_hints(false));
        let report = Autoplayer::new(5).run(&mut engine);
        assert!(report.moves > 0);
    }

    #[test]
    fn autoplay_stops_at_game_over() {
        let mut engine = GameEngine::new(11, GameOptions::new(Difficulty::Expert));
        let report = Autoplayer::default().run(&mut engine);
        if report.game_over {
            assert!(engine.best_move().is_none());
            assert!(report.moves < Autoplayer::DEFAULT_MAX_MOVES);
        }
    }
}
