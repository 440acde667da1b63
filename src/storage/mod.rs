//! Pattern persistence.

pub mod pattern_storage;

pub use pattern_storage::{
    PatternFile, StorageError, load_compressed, load_json, load_pattern, save_compressed,
    save_json,
};
