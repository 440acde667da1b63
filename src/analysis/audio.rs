//! Audio file decoding for the authoring tool.

use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open audio file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode audio file: {0}")]
    Decoder(#[from] rodio::decoder::DecoderError),
}

/// Interleaved PCM samples in `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration(&self) -> f64 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64
    }
}

/// Decodes a whole file into memory.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;

    let sample_rate = source.sample_rate();
    let channels = source.channels() as usize;
    let samples: Vec<f32> = source.map(|s| s as f32 / i16::MAX as f32).collect();

    let audio = DecodedAudio {
        samples,
        channels,
        sample_rate,
    };
    log::info!(
        "AUDIO: Decoded {:?} ({:.1}s, {} ch, {} Hz)",
        path,
        audio.duration(),
        audio.channels,
        audio.sample_rate
    );
    Ok(audio)
}
