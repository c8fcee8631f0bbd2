//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core rules, autoplay, JSON protocol).
//!
//! # Board Dimensions
//!
//! The playfield is a 9x9 grid partitioned into nine 3x3 boxes:
//!
//! - **Size**: 9 rows by 9 columns (indexed 0-8)
//! - **Boxes**: 3x3 grid of 3x3 boxes, addressed by (box_row, box_col)
//! - **Anchor**: a block is placed by the top-left corner of its bounding box
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLACEMENT_POINTS_PER_CELL` | 2 | Points per occupied cell of a placed block |
//! | `LINE_POINTS` | 15 | Points per completed row or column |
//! | `SQUARE_POINTS` | 20 | Points per completed 3x3 box |
//! | `COMBO_BONUS` | 20 | Flat bonus for a qualifying combo clear |
//!
//! Clear points (including the combo bonus) are multiplied by the current level.
//!
//! # Level Thresholds
//!
//! Level 2 starts at `LEVEL_BASE_THRESHOLD` points. Every further threshold grows
//! by `(n - 1) * LEVEL_STEP_INCREASE` over the previous one, so the gaps compound.
//!
//! # Examples
//!
//! ```
//! use blockdoku_types::{Difficulty, Rotation, ShapeKind, BOARD_SIZE};
//!
//! // Parse from string (case-insensitive)
//! let kind = ShapeKind::from_str("line3").unwrap();
//! assert_eq!(kind, ShapeKind::Line3);
//!
//! // Rotate
//! assert_eq!(Rotation::Deg0.rotate_cw(), Rotation::Deg90);
//!
//! // Difficulty
//! assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
//!
//! assert_eq!(BOARD_SIZE, 9);
//! ```

/// Board edge length in cells
pub const BOARD_SIZE: usize = 9;

/// Edge length of one box
pub const BOX_SIZE: usize = 3;

/// Boxes per board axis
pub const BOXES_PER_SIDE: usize = BOARD_SIZE / BOX_SIZE;

/// Total number of cells on the board
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Largest bounding box edge a block shape may have
pub const MAX_SHAPE_DIM: usize = 5;

/// Number of blocks handed out per supply round
pub const DEFAULT_BLOCK_COUNT: usize = 3;

/// Points per occupied cell when a block is placed (never level-multiplied)
pub const PLACEMENT_POINTS_PER_CELL: u32 = 2;

/// Points per completed row or column
pub const LINE_POINTS: u32 = 15;

/// Points per completed 3x3 box
pub const SQUARE_POINTS: u32 = 20;

/// Bonus added to a clear that qualifies as a combo
pub const COMBO_BONUS: u32 = 20;

/// Score needed to reach level 2
pub const LEVEL_BASE_THRESHOLD: u32 = 200;

/// Growth factor per level step (5%)
pub const LEVEL_STEP_INCREASE: f64 = 0.05;

/// Highest reachable level; bounds the threshold walk
pub const MAX_LEVEL: u32 = 200;

/// Default number of simultaneous rows (or columns) that count as a combo
pub const DEFAULT_COMBO_THRESHOLD: usize = 2;


/// Catalog shapes
///
/// Each kind names a base orientation; other orientations come from [`Rotation`].
/// - **Single**: 1x1
/// - **Domino**, **Line3**, **Line4**, **Line5**: straight bars
/// - **Corner**: 2x2 with one cell missing
/// - **Square**: 2x2
/// - **L**, **J**, **T**, **S**, **Z**: four-cell tetromino shapes
/// - **Plus**, **BigCorner**, **U**, **BigSquare**: five-plus cell "creative" shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Single,
    Domino,
    Line3,
    Line4,
    Line5,
    Corner,
    Square,
    L,
    J,
    T,
    S,
    Z,
    Plus,
    BigCorner,
    U,
    BigSquare,
}

impl ShapeKind {
    /// Every catalog kind, in catalog order
    pub const ALL: [ShapeKind; 16] = [
        ShapeKind::Single,
        ShapeKind::Domino,
        ShapeKind::Line3,
        ShapeKind::Line4,
        ShapeKind::Line5,
        ShapeKind::Corner,
        ShapeKind::Square,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::Plus,
        ShapeKind::BigCorner,
        ShapeKind::U,
        ShapeKind::BigSquare,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdoku_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("single"), Some(ShapeKind::Single));
    /// assert_eq!(ShapeKind::from_str("Big_Corner"), Some(ShapeKind::BigCorner));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" => Some(ShapeKind::Single),
            "domino" => Some(ShapeKind::Domino),
            "line3" => Some(ShapeKind::Line3),
            "line4" => Some(ShapeKind::Line4),
            "line5" => Some(ShapeKind::Line5),
            "corner" => Some(ShapeKind::Corner),
            "square" => Some(ShapeKind::Square),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "plus" => Some(ShapeKind::Plus),
            "big_corner" => Some(ShapeKind::BigCorner),
            "u" => Some(ShapeKind::U),
            "big_square" => Some(ShapeKind::BigSquare),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Single => "single",
            ShapeKind::Domino => "domino",
            ShapeKind::Line3 => "line3",
            ShapeKind::Line4 => "line4",
            ShapeKind::Line5 => "line5",
            ShapeKind::Corner => "corner",
            ShapeKind::Square => "square",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::Plus => "plus",
            ShapeKind::BigCorner => "big_corner",
            ShapeKind::U => "u",
            ShapeKind::BigSquare => "big_square",
        }
    }
}

/// Clockwise rotation applied to a catalog shape
///
/// The rotation cycle goes: 0° → 90° → 180° → 270° → 0°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }

    /// Number of clockwise quarter turns from the base orientation
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(&self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Parse from degrees (0, 90, 180, 270)
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// Parse difficulty from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// Special behaviour carried by a wild block
///
/// These are presentation-level effects. The rule engine treats a wild block
/// exactly like a standard block of the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildKind {
    Bomb,
    Lightning,
    Ghost,
}

impl WildKind {
    pub const ALL: [WildKind; 3] = [WildKind::Bomb, WildKind::Lightning, WildKind::Ghost];

    pub fn as_str(&self) -> &'static str {
        match self {
            WildKind::Bomb => "bomb",
            WildKind::Lightning => "lightning",
            WildKind::Ghost => "ghost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(WildKind::Bomb),
            "lightning" => Some(WildKind::Lightning),
            "ghost" => Some(WildKind::Ghost),
            _ => None,
        }
    }
}

/// Block metadata tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTag {
    #[default]
    Standard,
    /// Drawn from the creative shape set (only offered on harder difficulties)
    Creative,
    Wild(WildKind),
}

impl BlockTag {
    pub fn is_wild(&self) -> bool {
        matches!(self, BlockTag::Wild(_))
    }

    pub fn wild_kind(&self) -> Option<WildKind> {
        match self {
            BlockTag::Wild(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Parse `standard`, `creative` or `wild:<kind>`
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "standard" => Some(BlockTag::Standard),
            "creative" => Some(BlockTag::Creative),
            other => other
                .strip_prefix("wild:")
                .and_then(WildKind::from_str)
                .map(BlockTag::Wild),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Standard => "standard",
            BlockTag::Creative => "creative",
            BlockTag::Wild(WildKind::Bomb) => "wild:bomb",
            BlockTag::Wild(WildKind::Lightning) => "wild:lightning",
            BlockTag::Wild(WildKind::Ghost) => "wild:ghost",
        }
    }
}

/// How fractional level thresholds are turned into integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    Ceil,
    Floor,
    #[default]
    Round,
}

impl RoundingMode {
    pub fn apply(&self, value: f64) -> u32 {
        // Snap away float noise (220.00000000000003) before rounding.
        let value = (value * 1e6).round() / 1e6;
        let rounded = match self {
            RoundingMode::Ceil => value.ceil(),
            RoundingMode::Floor => value.floor(),
            RoundingMode::Round => value.round(),
        };
        if rounded <= 0.0 {
            0
        } else if rounded >= u32::MAX as f64 {
            u32::MAX
        } else {
            rounded as u32
        }
    }
}

/// Top-left anchor of a block's bounding box
///
/// Signed so callers can express (and get rejected for) off-board anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}
