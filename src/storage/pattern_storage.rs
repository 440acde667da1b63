//! Pattern files: readable JSON and compressed binary.
//!
//! Binary patterns are serialized with `bincode` and compressed with Zstd,
//! stored as `{fingerprint}.rfp`. Every load path goes back through
//! `Pattern::load`, so a file on disk can never bypass validation.

use crate::models::engine::{NoteDescriptor, Pattern, PatternValidationError, import_osu};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zstd::stream::{decode_all, encode_all};

/// Current on-disk format version.
pub const PATTERN_FORMAT_VERSION: u32 = 1;

/// Extension of compressed pattern files.
pub const COMPRESSED_EXTENSION: &str = "rfp";

/// Zstd level for pattern files.
const COMPRESSION_LEVEL: i32 = 19;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("serialization error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("deserialization error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("invalid pattern: {0}")]
    Invalid(#[from] PatternValidationError),
    #[error("unsupported pattern format version {0}")]
    UnsupportedVersion(u32),
    #[error("import failed: {0}")]
    Import(String),
    #[error("unknown pattern file type: {0:?}")]
    UnknownFormat(PathBuf),
}

/// Serialized form of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFile {
    pub version: u32,
    pub lane_count: u8,
    pub notes: Vec<NoteDescriptor>,
}

impl PatternFile {
    pub fn from_pattern(pattern: &Pattern) -> Self {
        Self {
            version: PATTERN_FORMAT_VERSION,
            lane_count: pattern.lane_count(),
            notes: pattern.notes().to_vec(),
        }
    }

    /// Validates the file contents into a pattern.
    pub fn into_pattern(self) -> Result<Pattern, StorageError> {
        if self.version > PATTERN_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(self.version));
        }
        Ok(Pattern::load(self.notes, self.lane_count)?)
    }
}

/// Path of the compressed file for `pattern` inside `dir`.
pub fn compressed_path(dir: &Path, pattern: &Pattern) -> PathBuf {
    dir.join(format!("{}.{}", pattern.fingerprint(), COMPRESSED_EXTENSION))
}

pub fn save_json(path: &Path, pattern: &Pattern) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(&PatternFile::from_pattern(pattern))?;
    fs::write(path, content)?;
    log::info!("STORAGE: Saved {} notes to {:?}", pattern.len(), path);
    Ok(())
}

pub fn load_json(path: &Path) -> Result<Pattern, StorageError> {
    let content = fs::read_to_string(path)?;
    let file: PatternFile = serde_json::from_str(&content)?;
    file.into_pattern()
}

/// Saves `pattern` as a compressed binary file.
pub fn save_compressed(path: &Path, pattern: &Pattern) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Serialize to binary first, then compress
    let binary_data = bincode::serde::encode_to_vec(
        PatternFile::from_pattern(pattern),
        bincode::config::standard(),
    )?;
    let compressed_data = encode_all(&binary_data[..], COMPRESSION_LEVEL)?;

    let mut file = File::create(path)?;
    file.write_all(&compressed_data)?;
    log::info!(
        "STORAGE: Saved {} notes to {:?} ({} bytes)",
        pattern.len(),
        path,
        compressed_data.len()
    );
    Ok(())
}

pub fn load_compressed(path: &Path) -> Result<Pattern, StorageError> {
    let file = File::open(path)?;
    let binary_data = decode_all(file)?;
    let (data, _len): (PatternFile, usize) =
        bincode::serde::decode_from_slice(&binary_data, bincode::config::standard())?;
    data.into_pattern()
}

/// Loads a pattern by file extension: `.json`, `.rfp` or an osu! `.osu`
/// beatmap (imported onto `lane_count` lanes).
pub fn load_pattern(path: &Path, lane_count: u8) -> Result<Pattern, StorageError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => load_json(path),
        Some(COMPRESSED_EXTENSION) => load_compressed(path),
        Some("osu") => import_osu(path, lane_count)
            .map(|(_, pattern)| pattern)
            .map_err(StorageError::Import),
        _ => Err(StorageError::UnknownFormat(path.to_path_buf())),
    }
}
