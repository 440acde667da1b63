//! Command line front end: author patterns from audio and replay them headless.
//!
//! # Usage
//!
//! ```bash
//! ringfire analyze song.ogg song.json --bpm 128
//! ringfire simulate song.json --config ringfire.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ringfire::analysis::{OnsetDetector, decode_file, pattern_from_onsets};
use ringfire::logic::autoplay::Autoplay;
use ringfire::models::settings::EngineConfig;
use ringfire::storage::pattern_storage::compressed_path;
use ringfire::storage::{load_pattern, save_compressed, save_json};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ringfire")]
#[command(version, about = "Pattern authoring and headless playback for ringfire")]
struct Cli {
    /// Engine configuration (TOML); defaults are used when it is missing
    #[arg(long, global = true, default_value = "ringfire.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect onsets in an audio file and write a pattern
    Analyze {
        /// Audio file to analyze
        audio: PathBuf,

        /// Output pattern (JSON); a compressed copy is written next to it
        out: PathBuf,

        /// Tempo of the quantization grid, overriding the config
        #[arg(long)]
        bpm: Option<f64>,
    },

    /// Play a pattern (.json, .rfp or .osu) with perfect input and report the result
    Simulate {
        /// Pattern file
        pattern: PathBuf,
    },
}

fn analyze(config: EngineConfig, audio: &Path, out: &Path, bpm: Option<f64>) -> Result<()> {
    let mut authoring = config.authoring;
    if let Some(bpm) = bpm {
        authoring.bpm = bpm;
    }

    let decoded = decode_file(audio)?;
    let detector = OnsetDetector::new(config.onset).context("Invalid onset configuration")?;
    let onsets = detector.detect(&decoded.samples, decoded.channels, decoded.sample_rate);
    log::info!("ONSET: {} onsets in {:?}", onsets.len(), audio);

    let pattern = pattern_from_onsets(&onsets, &authoring).context("Generated pattern is invalid")?;
    save_json(out, &pattern).with_context(|| format!("Failed to write {:?}", out))?;

    let dir = out.parent().unwrap_or_else(|| Path::new("."));
    let compressed = compressed_path(dir, &pattern);
    save_compressed(&compressed, &pattern)
        .with_context(|| format!("Failed to write {:?}", compressed))?;
    Ok(())
}

fn simulate(config: EngineConfig, path: &Path) -> Result<()> {
    let pattern = load_pattern(path, config.main_lanes())
        .with_context(|| format!("Failed to load pattern {:?}", path))?;
    log::info!("MAIN: Simulating {} notes from {:?}", pattern.len(), path);

    let result = Autoplay::run_pattern(config, pattern)
        .context("Pattern does not fit the configured playfield")?;
    let stats = &result.hit_stats;
    log::info!(
        "MAIN: perfect {} good {} late {} miss {} ghost {}",
        stats.perfect,
        stats.good,
        stats.late,
        stats.miss,
        stats.ghost_tap
    );
    log::info!(
        "MAIN: score {} max combo {} accuracy {:.2}% final mode {:?} at {:.2}s",
        result.score,
        result.max_combo,
        result.accuracy,
        result.final_mode,
        result.end_time
    );
    for (time, mode) in &result.transitions {
        log::debug!("MAIN: {:>8.3}s -> {:?}", time, mode);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Analyze { audio, out, bpm } => analyze(config, &audio, &out, bpm),
        Commands::Simulate { pattern } => simulate(config, &pattern),
    }
}
