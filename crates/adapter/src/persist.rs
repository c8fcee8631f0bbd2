//! Save files
//!
//! A save is one [`SavedGame`] JSON document. Writes go to a sibling temp
//! file which is then renamed over the target, so readers only ever see a
//! complete old save or a complete new one.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{Board, GameSnapshot};
use crate::protocol::{SavedGame, SAVE_FORMAT_VERSION};

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedVersion(u32),
    Invalid(String),
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            PersistError::Io(_) => "io",
            PersistError::Json(_) => "invalid_json",
            PersistError::UnsupportedVersion(_) | PersistError::Invalid(_) => "invalid_save",
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "save file I/O failed: {}", e),
            PersistError::Json(e) => write!(f, "save file is not valid JSON: {}", e),
            PersistError::UnsupportedVersion(v) => write!(
                f,
                "save format version {} is not supported (expected {})",
                v, SAVE_FORMAT_VERSION
            ),
            PersistError::Invalid(msg) => write!(f, "invalid save: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

/// Check a decoded save and convert it to a snapshot
pub fn validate_saved(saved: &SavedGame) -> Result<GameSnapshot, PersistError> {
    if saved.version != SAVE_FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(saved.version));
    }
    let snap = saved.game.to_snapshot().map_err(PersistError::Invalid)?;
    Board::from_grid(&snap.board).map_err(|(row, col, value)| {
        PersistError::Invalid(format!("cell ({}, {}) holds {}", row, col, value))
    })?;
    if snap.level == 0 {
        return Err(PersistError::Invalid("level must be at least 1".to_string()));
    }
    Ok(snap)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `snap` to `path`, replacing any previous save atomically
pub fn save_to_path(path: impl AsRef<Path>, snap: &GameSnapshot) -> Result<(), PersistError> {
    let path = path.as_ref();
    let tmp = temp_path(path);
    let saved = SavedGame::from_snapshot(snap);

    let result = (|| -> Result<(), PersistError> {
        let mut file = fs::File::create(&tmp)?;
        serde_json::to_writer_pretty(&mut file, &saved)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        info!(path = %path.display(), score = snap.score, "game saved");
    }
    result
}

/// Read and validate a save written by [`save_to_path`]
pub fn load_from_path(path: impl AsRef<Path>) -> Result<GameSnapshot, PersistError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let saved: SavedGame = serde_json::from_slice(&data)?;
    let snap = validate_saved(&saved)?;
    debug!(path = %path.display(), moves = snap.move_count, "game loaded");
    Ok(snap)
}
