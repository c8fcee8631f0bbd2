//! Scoring module - placement points, clear points, combos and levels
//!
//! Rules:
//! - Placing a block earns `cells * 2`. This is never level-multiplied.
//! - A clear earns `(rows + columns) * LINE_POINTS + boxes * SQUARE_POINTS`,
//!   plus `COMBO_BONUS` when the clear qualifies as a combo. That sum is
//!   multiplied by the current level and then by the difficulty multiplier.
//! - The combo streak grows on each combo clear and resets to 0 on any other
//!   move, including moves that clear nothing.
//! - Level is derived from cumulative score through compounding thresholds
//!   and never goes down.

use crate::board::ClearedLines;
use crate::difficulty::DifficultyConfig;
use crate::types::{
    RoundingMode, COMBO_BONUS, LEVEL_BASE_THRESHOLD, LEVEL_STEP_INCREASE, LINE_POINTS,
    MAX_LEVEL, PLACEMENT_POINTS_PER_CELL, SQUARE_POINTS,
};

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub placement_points_per_cell: u32,
    pub line_points: u32,
    pub square_points: u32,
    pub combo_bonus: u32,
    pub level_base_threshold: u32,
    pub level_step_increase: f64,
    pub rounding: RoundingMode,
    pub max_level: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            placement_points_per_cell: PLACEMENT_POINTS_PER_CELL,
            line_points: LINE_POINTS,
            square_points: SQUARE_POINTS,
            combo_bonus: COMBO_BONUS,
            level_base_threshold: LEVEL_BASE_THRESHOLD,
            level_step_increase: LEVEL_STEP_INCREASE,
            rounding: RoundingMode::Round,
            max_level: MAX_LEVEL,
        }
    }
}

/// Score calculation result for one clear event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearScore {
    /// Unmultiplied points for completed rows and columns
    pub line_points: u32,
    /// Unmultiplied points for completed boxes
    pub square_points: u32,
    /// Unmultiplied combo bonus (0 when not a combo)
    pub combo_bonus: u32,
    pub is_combo: bool,
    /// Level the clear was scored at
    pub level: u32,
    /// Final points added to the score
    pub total: u32,
}

impl ClearScore {
    pub fn base(&self) -> u32 {
        self.line_points + self.square_points
    }
}

/// Points by category, for statistics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub placement: u32,
    pub lines: u32,
    pub squares: u32,
    pub combo: u32,
}

/// Calculate placement points for a block with `cells` occupied cells
pub fn calculate_placement_score(cells: u32, rules: &ScoringRules) -> u32 {
    cells.saturating_mul(rules.placement_points_per_cell)
}

/// Calculate the score of a clear event (pure).
///
/// The level and difficulty multipliers compose; the result is floored.
pub fn calculate_clear_score(
    cleared: &ClearedLines,
    level: u32,
    difficulty: &DifficultyConfig,
    rules: &ScoringRules,
) -> ClearScore {
    if cleared.is_empty() {
        return ClearScore {
            level,
            ..ClearScore::default()
        };
    }

    let line_points = (cleared.line_count() as u32).saturating_mul(rules.line_points);
    let square_points = (cleared.squares.len() as u32).saturating_mul(rules.square_points);
    let is_combo = cleared.is_combo(difficulty.combo_threshold);
    let combo_bonus = if is_combo { rules.combo_bonus } else { 0 };

    let raw = line_points
        .saturating_add(square_points)
        .saturating_add(combo_bonus)
        .saturating_mul(level.max(1));
    let total = apply_multiplier(raw, difficulty.score_multiplier);

    ClearScore {
        line_points,
        square_points,
        combo_bonus,
        is_combo,
        level,
        total,
    }
}

fn apply_multiplier(points: u32, multiplier: f64) -> u32 {
    if multiplier == 1.0 {
        return points;
    }
    let scaled = (points as f64 * multiplier).floor();
    if scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Minimum score for `level`.
///
/// Level 1 starts at 0, level 2 at the base threshold, and each further
/// threshold is `previous * (1 + (n - 1) * step)`, rounded per `rules`.
pub fn level_threshold(level: u32, rules: &ScoringRules) -> u32 {
    if level <= 1 {
        return 0;
    }
    let mut threshold = rules.level_base_threshold;
    for n in 3..=level.min(rules.max_level) {
        threshold = next_threshold(threshold, n, rules);
    }
    threshold
}

fn next_threshold(previous: u32, level: u32, rules: &ScoringRules) -> u32 {
    let factor = 1.0 + (level - 1) as f64 * rules.level_step_increase;
    rules.rounding.apply(previous as f64 * factor)
}

/// Highest level whose threshold `score` reaches, capped at `max_level`
pub fn calculate_level(score: u32, rules: &ScoringRules) -> u32 {
    let mut level = 1;
    let mut next = rules.level_base_threshold;
    while level < rules.max_level && score >= next {
        level += 1;
        next = next_threshold(next, level + 1, rules);
    }
    level
}

/// Cumulative scoring state of one game
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSystem {
    rules: ScoringRules,
    score: u32,
    level: u32,
    lines_cleared: u32,
    squares_cleared: u32,
    combo: u32,
    max_combo: u32,
    breakdown: ScoreBreakdown,
}

impl ScoringSystem {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            score: 0,
            level: 1,
            lines_cleared: 0,
            squares_cleared: 0,
            combo: 0,
            max_combo: 0,
            breakdown: ScoreBreakdown::default(),
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn squares_cleared(&self) -> u32 {
        self.squares_cleared
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        self.breakdown
    }

    /// Placement points for `cells` occupied cells (pure)
    pub fn placement_points(&self, cells: u32) -> u32 {
        calculate_placement_score(cells, &self.rules)
    }

    /// Clear points at the current level (pure)
    pub fn clear_points(&self, cleared: &ClearedLines, difficulty: &DifficultyConfig) -> ClearScore {
        calculate_clear_score(cleared, self.level, difficulty, &self.rules)
    }

    /// Score a placed block and add it to the total.
    ///
    /// Level is left alone so the clear of the same move is scored at the
    /// level the move started on; [`apply_clear`](Self::apply_clear) updates it.
    pub fn apply_placement(&mut self, cells: u32) -> u32 {
        let points = self.placement_points(cells);
        self.score = self.score.saturating_add(points);
        self.breakdown.placement = self.breakdown.placement.saturating_add(points);
        points
    }

    /// Score the clear part of a move and update the combo streak.
    ///
    /// An empty `cleared` resets the streak and scores nothing.
    pub fn apply_clear(&mut self, cleared: &ClearedLines, difficulty: &DifficultyConfig) -> ClearScore {
        let result = self.clear_points(cleared, difficulty);

        if result.is_combo {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }

        if cleared.is_empty() {
            self.update_level();
            return result;
        }

        self.lines_cleared += cleared.line_count() as u32;
        self.squares_cleared += cleared.squares.len() as u32;

        // Breakdown tracks the multiplied share of each category.
        let multiplied = |points: u32| {
            apply_multiplier(
                points.saturating_mul(result.level.max(1)),
                difficulty.score_multiplier,
            )
        };
        self.breakdown.lines = self.breakdown.lines.saturating_add(multiplied(result.line_points));
        self.breakdown.squares = self
            .breakdown
            .squares
            .saturating_add(multiplied(result.square_points));
        self.breakdown.combo = self.breakdown.combo.saturating_add(multiplied(result.combo_bonus));

        self.score = self.score.saturating_add(result.total);
        self.update_level();
        result
    }

    /// Recompute level from score; never lowers it
    pub fn update_level(&mut self) -> u32 {
        let computed = calculate_level(self.score, &self.rules);
        self.level = self.level.max(computed);
        self.level
    }

    /// Points still needed for the next level (0 at the cap)
    pub fn points_to_next_level(&self) -> u32 {
        if self.level >= self.rules.max_level {
            return 0;
        }
        level_threshold(self.level + 1, &self.rules).saturating_sub(self.score)
    }

    /// Overwrite counters from a saved game
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        &mut self,
        score: u32,
        level: u32,
        lines_cleared: u32,
        squares_cleared: u32,
        combo: u32,
        max_combo: u32,
        breakdown: ScoreBreakdown,
    ) {
        self.score = score;
        self.level = level.clamp(1, self.rules.max_level);
        self.lines_cleared = lines_cleared;
        self.squares_cleared = squares_cleared;
        self.combo = combo;
        self.max_combo = max_combo.max(combo);
        self.breakdown = breakdown;
        self.update_level();
    }

    /// Zero all counters and return to level 1
    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }
}

impl Default for ScoringSystem {
    fn default() -> Self {
        Self::new(ScoringRules::default())
    }
}
