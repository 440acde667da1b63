//! Definitions and constructors for angular and temporal hit windows.

use crate::models::engine::constants::*;
use crate::models::stats::HitTier;
use serde::{Deserialize, Serialize};

/// Outcome of releasing a hold note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Released inside the window (or in the lenient band).
    Success(HitTier),
    /// Released far too early.
    Failure,
}

/// Windows for ring mode, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngularWindow {
    pub target_deg: f64,
    pub perfect_deg: f64,
    pub good_deg: f64,
    pub hold_release_deg: f64,
    /// Tail angle above which a release counts as a failure.
    pub hold_early_release_deg: f64,
}

impl AngularWindow {
    pub fn new() -> Self {
        Self {
            target_deg: TARGET_ANGLE_DEG,
            perfect_deg: PERFECT_WINDOW_DEG,
            good_deg: GOOD_WINDOW_DEG,
            hold_release_deg: HOLD_RELEASE_WINDOW_DEG,
            hold_early_release_deg: HOLD_EARLY_RELEASE_DEG,
        }
    }

    /// Circular distance between a note angle and the target, in [0, 180].
    pub fn delta(&self, angle_deg: f64) -> f64 {
        delta_angle(angle_deg, self.target_deg)
    }

    /// Tier for a head hit at `delta` degrees, `None` outside the good window.
    pub fn judge(&self, delta: f64) -> Option<HitTier> {
        if delta <= self.perfect_deg {
            Some(HitTier::Perfect)
        } else if delta <= self.good_deg {
            Some(HitTier::Good)
        } else {
            None
        }
    }

    /// Judges a hold release from the tail angle (linear, not wrapped).
    pub fn judge_release(&self, tail_deg: f64) -> ReleaseOutcome {
        let remaining = tail_deg - self.target_deg;
        let early_limit = self.hold_early_release_deg - self.target_deg;
        classify_release(remaining, self.hold_release_deg, self.perfect_deg, early_limit)
    }
}

impl Default for AngularWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Windows for osu-style mode, in seconds and playfield units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalWindow {
    pub perfect_s: f64,
    pub hit_threshold_s: f64,
    /// Releasing more than this long before the tail fails the hold.
    pub early_release_s: f64,
    pub hit_distance: f32,
    pub min_slash_speed: f32,
}

impl TemporalWindow {
    pub fn new() -> Self {
        Self {
            perfect_s: PERFECT_THRESHOLD_S,
            hit_threshold_s: HIT_THRESHOLD_S,
            early_release_s: HIT_THRESHOLD_S,
            hit_distance: HIT_DISTANCE,
            min_slash_speed: MIN_SLASH_SPEED,
        }
    }

    /// Tier for a hit `diff_s` seconds away from the note, `None` outside the window.
    pub fn judge(&self, diff_s: f64) -> Option<HitTier> {
        let abs_diff = diff_s.abs();
        if abs_diff <= self.perfect_s {
            Some(HitTier::Perfect)
        } else if abs_diff <= self.hit_threshold_s {
            Some(HitTier::Good)
        } else {
            None
        }
    }

    /// Judges a hold release `remaining_s` seconds before its tail time.
    pub fn judge_release(&self, remaining_s: f64) -> ReleaseOutcome {
        classify_release(
            remaining_s,
            self.hit_threshold_s,
            self.perfect_s,
            self.early_release_s,
        )
    }
}

impl Default for TemporalWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Circular distance between two angles, in [0, 180].
pub fn delta_angle(a_deg: f64, b_deg: f64) -> f64 {
    ((a_deg - b_deg + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Shared release rule. `remaining` is how far the tail still has to travel
/// (positive = early, negative = already passed).
fn classify_release(remaining: f64, window: f64, perfect: f64, early_limit: f64) -> ReleaseOutcome {
    if remaining.abs() <= window {
        if remaining.abs() <= perfect {
            ReleaseOutcome::Success(HitTier::Perfect)
        } else {
            ReleaseOutcome::Success(HitTier::Good)
        }
    } else if remaining > early_limit {
        ReleaseOutcome::Failure
    } else if remaining > 0.0 {
        ReleaseOutcome::Success(HitTier::Good)
    } else {
        // Tail already passed: accepted as late.
        ReleaseOutcome::Success(HitTier::Late)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_angle_wraps() {
        assert!((delta_angle(450.0, 90.0)).abs() < 1e-9);
        assert!((delta_angle(80.0, 90.0) - 10.0).abs() < 1e-9);
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((delta_angle(-180.0, 90.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_tiers() {
        let w = AngularWindow::new();
        assert_eq!(w.judge(w.delta(95.0)), Some(HitTier::Perfect));
        assert_eq!(w.judge(w.delta(105.0)), Some(HitTier::Good));
        assert_eq!(w.judge(w.delta(115.0)), None);
    }

    #[test]
    fn test_hold_release_leniency() {
        let w = AngularWindow::new();
        assert_eq!(w.judge_release(95.0), ReleaseOutcome::Success(HitTier::Perfect));
        assert_eq!(w.judge_release(125.0), ReleaseOutcome::Failure);
        assert_eq!(w.judge_release(55.0), ReleaseOutcome::Success(HitTier::Late));
    }

    #[test]
    fn test_temporal_window() {
        let w = TemporalWindow::new();
        assert_eq!(w.judge(10.15 - 10.0), Some(HitTier::Good));
        assert_eq!(w.judge(0.05), Some(HitTier::Perfect));
        assert_eq!(w.judge(10.25 - 10.0), None);
        assert_eq!(w.judge_release(0.5), ReleaseOutcome::Failure);
        assert_eq!(w.judge_release(-0.5), ReleaseOutcome::Success(HitTier::Late));
    }
}
