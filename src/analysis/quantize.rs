//! Turns raw onset times into playable patterns.

use crate::models::engine::{NoteDescriptor, Pattern, PatternValidationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringConfig {
    pub bpm: f64,
    /// Grid steps per beat (4 = sixteenth notes in 4/4).
    pub subdivision: u32,
    /// Time of the first beat.
    pub offset_s: f64,
    /// Notes closer than this to the previous kept note are dropped.
    pub min_gap_s: f64,
    /// Gap to the next note needed before a hold may be placed.
    pub hold_min_gap_s: f64,
    pub hold_chance: f64,
    pub drag_chance: f64,
    pub lane_count: u8,
    pub seed: u64,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            subdivision: 4,
            offset_s: 0.0,
            min_gap_s: 0.1,
            hold_min_gap_s: 1.0,
            hold_chance: 0.25,
            drag_chance: 0.1,
            lane_count: 4,
            seed: 0x5EED,
        }
    }
}

impl AuthoringConfig {
    /// Length of one grid step in seconds.
    pub fn grid_step(&self) -> f64 {
        60.0 / self.bpm / self.subdivision.max(1) as f64
    }
}

/// Snaps every onset to the nearest grid line and drops exact duplicates.
/// A non-positive bpm leaves the times unsnapped.
pub fn quantize_onsets(onsets: &[f64], config: &AuthoringConfig) -> Vec<f64> {
    let step = config.grid_step();
    let mut snapped: Vec<f64> = onsets
        .iter()
        .filter(|t| t.is_finite())
        .map(|&t| {
            if step.is_finite() && step > 0.0 {
                let beats = ((t - config.offset_s) / step).round();
                (config.offset_s + beats * step).max(0.0)
            } else {
                t
            }
        })
        .collect();
    snapped.sort_by(|a, b| a.total_cmp(b));
    snapped.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    snapped
}

/// Drops times closer than `epsilon` to the last kept time.
pub fn drop_close(times: &[f64], epsilon: f64) -> Vec<f64> {
    let mut kept: Vec<f64> = Vec::with_capacity(times.len());
    for &t in times {
        match kept.last() {
            Some(&last) if t - last < epsilon => {}
            _ => kept.push(t),
        }
    }
    kept
}

/// Builds a pattern from sorted note times: random lanes, holds where the
/// gap allows, occasional drag notes.
pub fn generate_pattern(
    times: &[f64],
    config: &AuthoringConfig,
) -> Result<Pattern, PatternValidationError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let lanes = config.lane_count.max(1);
    let mut notes = Vec::with_capacity(times.len());

    for (i, &time) in times.iter().enumerate() {
        let lane = rng.random_range(0..lanes);
        let gap = times.get(i + 1).map(|next| next - time);

        let note = match gap {
            Some(gap) if gap >= config.hold_min_gap_s && rng.random_bool(config.hold_chance.clamp(0.0, 1.0)) => {
                NoteDescriptor::hold(time, lane, gap * 0.5)
            }
            _ if rng.random_bool(config.drag_chance.clamp(0.0, 1.0)) => {
                NoteDescriptor::drag(time, lane)
            }
            _ => NoteDescriptor::tap(time, lane),
        };
        notes.push(note);
    }

    Pattern::load(notes, lanes)
}

/// Runs the whole authoring chain on detected onsets.
pub fn pattern_from_onsets(
    onsets: &[f64],
    config: &AuthoringConfig,
) -> Result<Pattern, PatternValidationError> {
    let snapped = quantize_onsets(onsets, config);
    let times = drop_close(&snapped, config.min_gap_s);
    log::info!(
        "AUTHOR: {} onsets -> {} grid notes -> {} kept",
        onsets.len(),
        snapped.len(),
        times.len()
    );
    generate_pattern(&times, config)
}

/// Evenly spaced hyper stream with random lanes, starting at `lead_in_s`.
pub fn generate_stream(
    duration_s: f64,
    notes_per_s: f64,
    lead_in_s: f64,
    lane_count: u8,
    seed: u64,
) -> Pattern {
    let lanes = lane_count.max(1);
    let positive = |x: f64| x.is_finite() && x > 0.0;
    if !positive(notes_per_s) || !positive(duration_s) {
        return Pattern::empty(lanes);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let count = (duration_s * notes_per_s).floor() as usize;
    let interval = 1.0 / notes_per_s;
    let notes = (0..count)
        .map(|i| NoteDescriptor::hyper(lead_in_s + i as f64 * interval, rng.random_range(0..lanes)))
        .collect();

    Pattern::load(notes, lanes).unwrap_or_else(|e| {
        log::error!("AUTHOR: generated stream rejected: {}", e);
        Pattern::empty(lanes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::NoteKind;

    #[test]
    fn test_quantize_snaps_to_sixteenths() {
        // 120 bpm, 4 per beat -> 0.125s grid
        let config = AuthoringConfig::default();
        let snapped = quantize_onsets(&[0.13, 0.26, 0.24, 1.01], &config);
        assert_eq!(snapped, vec![0.125, 0.25, 1.0]);
    }

    #[test]
    fn test_drop_close_keeps_first() {
        assert_eq!(drop_close(&[0.0, 0.05, 0.2, 0.25, 0.5], 0.1), vec![0.0, 0.2, 0.5]);
    }

    #[test]
    fn test_generate_pattern_is_seeded() {
        let config = AuthoringConfig::default();
        let times: Vec<f64> = (0..32).map(|i| i as f64 * 0.5).collect();
        let a = generate_pattern(&times, &config).unwrap();
        let b = generate_pattern(&times, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.iter().all(|n| n.lane < 4));
        // Gaps of 0.5s never leave room for a hold.
        assert!(a.iter().all(|n| n.kind != NoteKind::Hold));
    }

    #[test]
    fn test_holds_fit_before_next_note() {
        let config = AuthoringConfig {
            hold_chance: 1.0,
            ..AuthoringConfig::default()
        };
        let pattern = generate_pattern(&[0.0, 2.0, 4.0], &config).unwrap();
        assert_eq!(pattern[0].kind, NoteKind::Hold);
        assert_eq!(pattern[0].duration, 1.0);
        // The last note has no next gap.
        assert_ne!(pattern[2].kind, NoteKind::Hold);
    }

    #[test]
    fn test_generate_stream_spacing() {
        let stream = generate_stream(2.0, 4.0, 1.0, 4, 7);
        assert_eq!(stream.len(), 8);
        assert_eq!(stream[0].time, 1.0);
        assert!((stream[1].time - 1.25).abs() < 1e-12);
        assert!(stream.iter().all(|n| n.kind == NoteKind::Hyper));
        assert!(generate_stream(0.0, 4.0, 0.0, 4, 7).is_empty());
    }

    #[test]
    fn test_generate_stream_rejects_unbounded_rates() {
        assert!(generate_stream(2.0, f64::INFINITY, 0.0, 4, 7).is_empty());
        assert!(generate_stream(2.0, f64::NAN, 0.0, 4, 7).is_empty());
        assert!(generate_stream(f64::INFINITY, 4.0, 0.0, 4, 7).is_empty());
    }
}
