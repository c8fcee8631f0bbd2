//! Protocol module - JSON message types for the session server
//!
//! One JSON object per line. Every message carries `type` and `seq`;
//! server messages also carry `ts` (ms since the Unix epoch).

use serde::{Deserialize, Serialize};

use crate::core::{
    Block, BlockId, GameOverResult, GameSnapshot, GameStats, Hint, PlacementResult,
    ScoreBreakdown, Shape,
};
use crate::types::{BlockTag, Difficulty, Rotation, ShapeKind, BOARD_SIZE};

/// Save file format version
pub const SAVE_FORMAT_VERSION: u32 = 1;

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    NewGame {
        seq: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        difficulty: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hints: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u32>,
    },
    Place {
        seq: u64,
        /// Index into the current pool
        block: usize,
        row: i32,
        col: i32,
        /// Target rotation in degrees; omitted keeps the offered orientation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<u16>,
    },
    Hint {
        seq: u64,
    },
    State {
        seq: u64,
    },
    CheckGameOver {
        seq: u64,
    },
    Save {
        seq: u64,
    },
    Load {
        seq: u64,
        game: SavedGame,
    },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::NewGame { seq, .. }
            | ClientMessage::Place { seq, .. }
            | ClientMessage::Hint { seq }
            | ClientMessage::State { seq }
            | ClientMessage::CheckGameOver { seq }
            | ClientMessage::Save { seq }
            | ClientMessage::Load { seq, .. } => *seq,
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_json")]
    InvalidJson,
    #[serde(rename = "invalid_seq")]
    InvalidSeq,
    #[serde(rename = "line_too_long")]
    LineTooLong,
    #[serde(rename = "invalid_difficulty")]
    InvalidDifficulty,
    #[serde(rename = "invalid_rotation")]
    InvalidRotation,
    #[serde(rename = "unknown_block")]
    UnknownBlock,
    #[serde(rename = "out_of_bounds")]
    OutOfBounds,
    #[serde(rename = "collision")]
    Collision,
    #[serde(rename = "game_over")]
    GameOver,
    #[serde(rename = "invalid_save")]
    InvalidSave,
}

impl ErrorCode {
    /// Map a wire code string (as produced by the engine errors)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_json" => Some(Self::InvalidJson),
            "invalid_seq" => Some(Self::InvalidSeq),
            "line_too_long" => Some(Self::LineTooLong),
            "invalid_difficulty" => Some(Self::InvalidDifficulty),
            "invalid_rotation" => Some(Self::InvalidRotation),
            "unknown_block" => Some(Self::UnknownBlock),
            "out_of_bounds" => Some(Self::OutOfBounds),
            "collision" => Some(Self::Collision),
            "game_over" => Some(Self::GameOver),
            "invalid_save" => Some(Self::InvalidSave),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Placed {
        seq: u64,
        ts: u64,
        #[serde(flatten)]
        placement: PlacementDto,
    },
    Hint {
        seq: u64,
        ts: u64,
        #[serde(flatten)]
        hint: HintDto,
    },
    State {
        seq: u64,
        ts: u64,
        state: StateDto,
    },
    GameOver {
        seq: u64,
        ts: u64,
        is_game_over: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        final_score: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        final_level: Option<u32>,
    },
    Saved {
        seq: u64,
        ts: u64,
        game: SavedGame,
    },
    Loaded {
        seq: u64,
        ts: u64,
        state: StateDto,
    },
    Error {
        seq: u64,
        ts: u64,
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ServerMessage::Placed { seq, .. }
            | ServerMessage::Hint { seq, .. }
            | ServerMessage::State { seq, .. }
            | ServerMessage::GameOver { seq, .. }
            | ServerMessage::Saved { seq, .. }
            | ServerMessage::Loaded { seq, .. }
            | ServerMessage::Error { seq, .. } => *seq,
        }
    }

    pub fn error(seq: u64, code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            seq,
            ts: current_timestamp_ms(),
            code,
            message: message.into(),
        }
    }

    pub fn game_over(seq: u64, result: GameOverResult) -> Self {
        ServerMessage::GameOver {
            seq,
            ts: current_timestamp_ms(),
            is_game_over: result.is_game_over,
            final_score: result.final_score,
            final_level: result.final_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearedDto {
    pub rows: Vec<u8>,
    pub columns: Vec<u8>,
    /// `[box_row, box_col]` pairs
    pub squares: Vec<[u8; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDto {
    pub block_id: u32,
    pub row: i32,
    pub col: i32,
    pub points_gained: u32,
    pub placement_points: u32,
    pub clear_points: u32,
    pub is_combo: bool,
    pub cleared: ClearedDto,
    pub cleared_count: usize,
    pub combo: u32,
    pub level_up: bool,
    pub game_over: bool,
    pub state: StateDto,
}

impl From<&PlacementResult> for PlacementDto {
    fn from(result: &PlacementResult) -> Self {
        Self {
            block_id: result.block_id.0,
            row: result.position.row,
            col: result.position.col,
            points_gained: result.points_gained,
            placement_points: result.placement_points,
            clear_points: result.clear.total,
            is_combo: result.clear.is_combo,
            cleared: ClearedDto {
                rows: result.cleared.rows.to_vec(),
                columns: result.cleared.columns.to_vec(),
                squares: result.cleared.squares.iter().map(|&(r, c)| [r, c]).collect(),
            },
            cleared_count: result.cleared_count,
            combo: result.combo,
            level_up: result.level_up,
            game_over: result.game_over.is_game_over,
            state: StateDto::from(&result.snapshot),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintDto {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_score: Option<u32>,
}

impl From<Option<Hint>> for HintDto {
    fn from(hint: Option<Hint>) -> Self {
        match hint {
            Some(h) => Self {
                available: true,
                block_index: Some(h.block_index),
                block_id: Some(h.block_id.0),
                row: Some(h.position.row),
                col: Some(h.position.col),
                expected_score: Some(h.expected_score),
            },
            None => Self {
                available: false,
                block_index: None,
                block_id: None,
                row: None,
                col: None,
                expected_score: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BreakdownDto {
    pub placement: u32,
    pub lines: u32,
    pub squares: u32,
    pub combo: u32,
}

impl From<ScoreBreakdown> for BreakdownDto {
    fn from(b: ScoreBreakdown) -> Self {
        Self {
            placement: b.placement,
            lines: b.lines,
            squares: b.squares,
            combo: b.combo,
        }
    }
}

impl From<BreakdownDto> for ScoreBreakdown {
    fn from(b: BreakdownDto) -> Self {
        Self {
            placement: b.placement,
            lines: b.lines,
            squares: b.squares,
            combo: b.combo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDto {
    pub id: u32,
    /// Catalog kind; absent for custom shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub rotation: u16,
    pub tag: String,
    pub color: String,
    pub points: u32,
    pub cells: Vec<Vec<u8>>,
}

impl From<&Block> for BlockDto {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id().0,
            kind: block.kind().map(|k| k.as_str().to_string()),
            rotation: block.rotation().degrees(),
            tag: block.tag().as_str().to_string(),
            color: block.color().to_string(),
            points: block.points(),
            cells: block.shape().to_rows(),
        }
    }
}

impl BlockDto {
    /// Rebuild the block; catalog blocks must match their stored cells
    pub fn to_block(&self) -> Result<Block, String> {
        let tag = BlockTag::from_str(&self.tag)
            .ok_or_else(|| format!("block {}: unknown tag {:?}", self.id, self.tag))?;
        let rotation = Rotation::from_degrees(self.rotation)
            .ok_or_else(|| format!("block {}: invalid rotation {}", self.id, self.rotation))?;

        let block = match &self.kind {
            Some(kind) => {
                let kind = ShapeKind::from_str(kind)
                    .ok_or_else(|| format!("block {}: unknown kind {:?}", self.id, kind))?;
                Block::new(BlockId(self.id), kind, rotation, tag)
            }
            None => {
                let shape = Shape::from_rows(self.cells.as_slice())
                    .map_err(|e| format!("block {}: {}", self.id, e))?;
                Block::custom(BlockId(self.id), shape).with_tag(tag)
            }
        };

        if block.shape().to_rows() != self.cells {
            return Err(format!("block {}: cells do not match its kind", self.id));
        }
        Ok(block)
    }
}

/// Full game state as sent to clients and stored in save files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDto {
    pub board: [[u8; BOARD_SIZE]; BOARD_SIZE],
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub move_count: u32,
    pub episode_id: u32,
    pub difficulty: String,
    pub hints_enabled: bool,
    pub lines_cleared: u32,
    pub squares_cleared: u32,
    pub combo: u32,
    pub max_combo: u32,
    #[serde(default)]
    pub points_to_next_level: u32,
    #[serde(default)]
    pub breakdown: BreakdownDto,
    pub blocks: Vec<BlockDto>,
}

impl From<&GameSnapshot> for StateDto {
    fn from(snap: &GameSnapshot) -> Self {
        Self {
            board: snap.board,
            score: snap.score,
            level: snap.level,
            game_over: snap.game_over,
            move_count: snap.move_count,
            episode_id: snap.episode_id,
            difficulty: snap.difficulty.as_str().to_string(),
            hints_enabled: snap.hints_enabled,
            lines_cleared: snap.stats.lines_cleared,
            squares_cleared: snap.stats.squares_cleared,
            combo: snap.stats.combo,
            max_combo: snap.stats.max_combo,
            points_to_next_level: snap.stats.points_to_next_level,
            breakdown: snap.stats.breakdown.into(),
            blocks: snap.blocks.iter().map(BlockDto::from).collect(),
        }
    }
}

impl StateDto {
    /// Convert back to a core snapshot.
    ///
    /// Checks names, tags and shapes; board and counters are checked by
    /// `GameEngine::restore`.
    pub fn to_snapshot(&self) -> Result<GameSnapshot, String> {
        let difficulty = Difficulty::from_str(&self.difficulty)
            .ok_or_else(|| format!("unknown difficulty {:?}", self.difficulty))?;
        let blocks = self
            .blocks
            .iter()
            .map(BlockDto::to_block)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GameSnapshot {
            board: self.board,
            score: self.score,
            level: self.level,
            game_over: self.game_over,
            move_count: self.move_count,
            episode_id: self.episode_id,
            difficulty,
            hints_enabled: self.hints_enabled,
            stats: GameStats {
                lines_cleared: self.lines_cleared,
                squares_cleared: self.squares_cleared,
                combo: self.combo,
                max_combo: self.max_combo,
                breakdown: self.breakdown.into(),
                points_to_next_level: self.points_to_next_level,
            },
            blocks,
        })
    }
}

/// Versioned save file / save message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub game: StateDto,
}

impl SavedGame {
    pub fn from_snapshot(snap: &GameSnapshot) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            game: StateDto::from(snap),
        }
    }
}

pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Pull `seq` out of a line that failed to parse, for the error reply
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameEngine, GameOptions};
    use crate::types::Position;

    #[test]
    fn test_parse_place() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"place","seq":3,"block":1,"row":4,"col":5}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Place {
                seq: 3,
                block: 1,
                row: 4,
                col: 5,
                rotation: None
            }
        );
        assert_eq!(msg.seq(), 3);
    }

    #[test]
    fn test_parse_new_game_defaults() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"new_game","seq":1}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::NewGame {
                seq: 1,
                difficulty: None,
                hints: None,
                seed: None
            }
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = serde_json::from_str::<ClientMessage>(r#"{"type":"teleport","seq":1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_error_serializes_code() {
        let msg = ServerMessage::error(9, ErrorCode::InvalidSeq, "seq must increase");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["seq"], 9);
        assert_eq!(json["code"], "invalid_seq");
    }

    #[test]
    fn test_error_code_from_engine_codes() {
        for code in ["unknown_block", "out_of_bounds", "collision", "game_over"] {
            let parsed = ErrorCode::from_code(code).unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), code);
        }
        assert!(ErrorCode::from_code("nope").is_none());
    }

    #[test]
    fn test_placed_message_is_flat() {
        let mut engine = GameEngine::new(5, GameOptions::default());
        let block = engine.current_blocks()[0].clone();
        let result = engine.place_block(&block, Position::new(0, 0)).unwrap();
        let msg = ServerMessage::Placed {
            seq: 2,
            ts: 0,
            placement: PlacementDto::from(&result),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "placed");
        assert_eq!(json["block_id"], block.id().0);
        assert_eq!(json["state"]["board"][0][0], 1);
    }

    #[test]
    fn test_state_dto_converts_back() {
        let engine = GameEngine::new(8, GameOptions::default());
        let snap = engine.snapshot();
        let dto = StateDto::from(&snap);
        assert_eq!(dto.to_snapshot().unwrap(), snap);
    }

    #[test]
    fn test_block_dto_rejects_mismatched_cells() {
        let block = Block::new(BlockId(1), ShapeKind::L, Rotation::Deg90, BlockTag::Standard);
        let mut dto = BlockDto::from(&block);
        dto.cells = vec![vec![1]];
        assert!(dto.to_block().is_err());

        let mut dto = BlockDto::from(&block);
        dto.tag = "wild:teleport".to_string();
        assert!(dto.to_block().is_err());
    }

    #[test]
    fn test_custom_block_dto() {
        let shape = Shape::from_rows(&[[1u8, 0], [1, 1]]).unwrap();
        let block = Block::custom(BlockId(4), shape).with_tag(BlockTag::Creative);
        let dto = BlockDto::from(&block);
        assert!(dto.kind.is_none());
        assert_eq!(dto.to_block().unwrap(), block);
    }

    #[test]
    fn test_custom_block_dto_without_extent_is_rejected() {
        let shape = Shape::from_rows(&[[1u8]]).unwrap();
        let mut dto = BlockDto::from(&Block::custom(BlockId(4), shape));
        dto.cells = Vec::new();
        assert!(dto.to_block().is_err());
        dto.cells = vec![Vec::new()];
        assert!(dto.to_block().is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"x"}"#), None);
    }
}
