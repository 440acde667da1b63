//! Engine configuration loaded from TOML.
//!
//! Every section has defaults, so a partial (or missing) file is fine.

use crate::analysis::onset::OnsetConfig;
use crate::analysis::quantize::AuthoringConfig;
use crate::models::engine::{AngularWindow, FlightConfig, RingConfig, TemporalWindow};
use crate::models::theme::ThemeRegistry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// How the main pattern is laid out and judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackStyle {
    /// Rotating ring notes, angular judging.
    Ring,
    /// Flying notes, temporal slash judging (osu-style).
    Flight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JudgeConfig {
    pub angular: AngularWindow,
    pub temporal: TemporalWindow,
}

/// Fuel amounts applied by the fire service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    pub initial: f32,
    /// Value restored by a revive; intentionally below full.
    pub revive: f32,
    pub perfect_gain: f32,
    pub good_gain: f32,
    pub late_gain: f32,
    pub miss_drain: f32,
    pub survival_drain_per_s: f32,
    pub theme_timeout_penalty: f32,
    pub shake_gain: f32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            initial: 0.5,
            revive: 0.4,
            perfect_gain: 0.04,
            good_gain: 0.025,
            late_gain: 0.01,
            miss_drain: 0.08,
            survival_drain_per_s: 0.02,
            theme_timeout_penalty: 0.15,
            shake_gain: 0.01,
        }
    }
}

/// Timers and gesture tuning for the special modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub groggy_duration_s: f64,
    /// Combo count that triggers a groggy phase in normal play.
    pub groggy_combo_trigger: Option<u32>,
    pub shake_touch_speed: f32,
    pub shake_accel: f32,
    pub shake_cooldown_s: f64,
    pub drag_resistance: f32,
    pub drag_max_offset: f32,

    /// Seconds of normal play between theme swaps (`None` disables them).
    pub theme_interval_s: Option<f64>,
    pub theme_deadline_s: f64,
    pub theme_fade_s: f64,
    pub swipe_min_length: f32,
    pub swipe_tolerance_deg: f32,

    pub pinch_gain: f32,
    pub pinch_decay_per_s: f32,

    pub hyper_duration_s: f64,
    pub hyper_notes_per_s: f64,
    pub hyper_lead_in_s: f64,

    pub ignition_fill_per_s: f32,
    pub ignition_decay_per_s: f32,
    /// Fraction of the ring radius, measured inward from the edge, that counts as touching it.
    pub ignition_edge_band: f32,

    pub seed: u64,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            groggy_duration_s: 5.0,
            groggy_combo_trigger: Some(50),
            shake_touch_speed: 6.0,
            shake_accel: 15.0,
            shake_cooldown_s: 0.25,
            drag_resistance: 0.35,
            drag_max_offset: 0.5,
            theme_interval_s: Some(60.0),
            theme_deadline_s: 3.0,
            theme_fade_s: 0.5,
            swipe_min_length: 0.3,
            swipe_tolerance_deg: 45.0,
            pinch_gain: 1.0,
            pinch_decay_per_s: 0.25,
            hyper_duration_s: 8.0,
            hyper_notes_per_s: 6.0,
            hyper_lead_in_s: 1.0,
            ignition_fill_per_s: 0.5,
            ignition_decay_per_s: 0.25,
            ignition_edge_band: 0.1,
            seed: 0x5EED,
        }
    }
}

/// Top-level configuration passed into the engine and the authoring tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub track_style: TrackStyle,
    pub ring: RingConfig,
    pub flight: FlightConfig,
    pub judge: JudgeConfig,
    pub fire: FireConfig,
    pub modes: ModeConfig,
    pub onset: OnsetConfig,
    pub authoring: AuthoringConfig,
    pub themes: ThemeRegistry,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            track_style: TrackStyle::Ring,
            ring: RingConfig::default(),
            flight: FlightConfig::default(),
            judge: JudgeConfig::default(),
            fire: FireConfig::default(),
            modes: ModeConfig::default(),
            onset: OnsetConfig::default(),
            authoring: AuthoringConfig::default(),
            themes: ThemeRegistry::default(),
        }
    }
}

impl EngineConfig {
    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                log::error!("CONFIG: Failed to parse {:?}: {}", path, e);
                Err(e.into())
            }
        }
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("CONFIG: {:?} not found, using defaults", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("CONFIG: {}, using defaults", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Lane count patterns for the main track must respect.
    pub fn main_lanes(&self) -> u8 {
        match self.track_style {
            TrackStyle::Ring => self.ring.lanes,
            TrackStyle::Flight => self.flight.lanes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            track_style = "Flight"

            [fire]
            revive = 0.3

            [ring]
            speed_deg_per_s = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.track_style, TrackStyle::Flight);
        assert_eq!(config.fire.revive, 0.3);
        assert_eq!(config.fire.initial, FireConfig::default().initial);
        assert_eq!(config.ring.speed_deg_per_s, 120.0);
        assert_eq!(config.ring.spawn_angle_deg, RingConfig::default().spawn_angle_deg);
        assert_eq!(config.main_lanes(), 4);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("ringfire_config_{}.toml", std::process::id()));
        let mut config = EngineConfig::default();
        config.modes.groggy_duration_s = 7.5;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = EngineConfig::load_or_default(Path::new("definitely/not/here.toml"));
        assert_eq!(config, EngineConfig::default());
    }
}
