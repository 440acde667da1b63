//! Offline pattern authoring: onset detection and pattern generation.

pub mod audio;
pub mod onset;
pub mod quantize;

pub use audio::{DecodeError, DecodedAudio, decode_file};
pub use onset::{AnalysisError, OnsetConfig, OnsetDetector, detect_onsets};
pub use quantize::{AuthoringConfig, generate_pattern, generate_stream, pattern_from_onsets};
