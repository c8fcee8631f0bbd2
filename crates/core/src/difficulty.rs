//! Difficulty configuration
//!
//! Each [`Difficulty`] maps to one immutable [`DifficultyConfig`]. The config
//! is handed to the engine at `new_game` and never mutated afterwards.

use crate::blocks::is_creative;
use crate::supply::GenerationConstraints;
use crate::types::{Difficulty, ShapeKind, DEFAULT_COMBO_THRESHOLD};

/// Rule parameters derived from a difficulty preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub difficulty: Difficulty,
    /// Applied to clear points on top of the level multiplier
    pub score_multiplier: f64,
    /// Simultaneous rows (or columns) needed for a combo
    pub combo_threshold: usize,
    /// Bounding-box edge range for generated blocks
    pub min_block_size: u8,
    pub max_block_size: u8,
    pub allow_creative: bool,
    pub wild_chance_percent: u8,
    pub hints_by_default: bool,
}

impl DifficultyConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                score_multiplier: 1.0,
                combo_threshold: DEFAULT_COMBO_THRESHOLD,
                min_block_size: 1,
                max_block_size: 3,
                allow_creative: false,
                wild_chance_percent: 0,
                hints_by_default: true,
            },
            Difficulty::Normal => Self {
                difficulty,
                score_multiplier: 1.0,
                combo_threshold: DEFAULT_COMBO_THRESHOLD,
                min_block_size: 1,
                max_block_size: 4,
                allow_creative: false,
                wild_chance_percent: 0,
                hints_by_default: true,
            },
            Difficulty::Hard => Self {
                difficulty,
                score_multiplier: 1.5,
                combo_threshold: DEFAULT_COMBO_THRESHOLD,
                min_block_size: 1,
                max_block_size: 5,
                allow_creative: true,
                wild_chance_percent: 5,
                hints_by_default: false,
            },
            Difficulty::Expert => Self {
                difficulty,
                score_multiplier: 2.0,
                combo_threshold: 3,
                min_block_size: 2,
                max_block_size: 5,
                allow_creative: true,
                wild_chance_percent: 10,
                hints_by_default: false,
            },
        }
    }

    /// Shapes the generator may draw from
    pub fn allowed_shapes(&self) -> Vec<ShapeKind> {
        ShapeKind::ALL
            .iter()
            .copied()
            .filter(|&kind| self.allow_creative || !is_creative(kind))
            .collect()
    }

    pub fn constraints(&self) -> GenerationConstraints {
        GenerationConstraints {
            allowed: self.allowed_shapes(),
            min_size: self.min_block_size,
            max_size: self.max_block_size,
            wild_chance_percent: self.wild_chance_percent,
        }
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

/// Options for starting a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOptions {
    pub difficulty: Difficulty,
    /// None follows the difficulty default
    pub hints_enabled: Option<bool>,
    /// None keeps the supply's current random stream
    pub seed: Option<u32>,
}

impl GameOptions {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            hints_enabled: None,
            seed: None,
        }
    }

    pub fn with_hints(mut self, enabled: bool) -> Self {
        self.hints_enabled = Some(enabled);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Effective hint setting for the given config
    pub fn hints_for(&self, config: &DifficultyConfig) -> bool {
        self.hints_enabled.unwrap_or(config.hints_by_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creative_shapes_filtered() {
        let normal = DifficultyConfig::for_difficulty(Difficulty::Normal);
        assert!(!normal.allowed_shapes().contains(&ShapeKind::Plus));
        assert!(normal.allowed_shapes().contains(&ShapeKind::Line4));

        let hard = DifficultyConfig::for_difficulty(Difficulty::Hard);
        assert!(hard.allowed_shapes().contains(&ShapeKind::Plus));
        assert_eq!(hard.allowed_shapes().len(), ShapeKind::ALL.len());
    }

    #[test]
    fn test_size_ranges_are_sane() {
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Expert,
        ] {
            let config = DifficultyConfig::for_difficulty(difficulty);
            assert!(config.min_block_size >= 1);
            assert!(config.min_block_size <= config.max_block_size);
            assert!(config.score_multiplier >= 1.0);
            assert!(config.combo_threshold >= 2);
        }
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(DifficultyConfig::default().difficulty, Difficulty::Normal);
        let options = GameOptions::new(Difficulty::Hard).with_hints(true);
        assert_eq!(options.hints_enabled, Some(true));
    }

    #[test]
    fn test_hints_follow_difficulty_unless_overridden() {
        let hard = DifficultyConfig::for_difficulty(Difficulty::Hard);
        assert!(!GameOptions::new(Difficulty::Hard).hints_for(&hard));
        assert!(GameOptions::new(Difficulty::Hard)
            .with_hints(true)
            .hints_for(&hard));

        let easy = DifficultyConfig::for_difficulty(Difficulty::Easy);
        assert!(GameOptions::default().hints_for(&easy));
    }
}
