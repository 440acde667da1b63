//! Gesture helpers used by the special modes.

use glam::{Vec2, Vec3};

/// Detects shakes from either the touch speed or the device accelerometer.
///
/// A shake is reported when either sensor crosses its threshold, at most once
/// per cooldown.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    touch_speed: f32,
    accel: f32,
    cooldown_s: f64,
    last_shake: Option<f64>,
}

impl ShakeDetector {
    pub fn new(touch_speed: f32, accel: f32, cooldown_s: f64) -> Self {
        Self {
            touch_speed,
            accel,
            cooldown_s,
            last_shake: None,
        }
    }

    pub fn update(&mut self, clock: f64, touch_speed: f32, acceleration: Vec3) -> bool {
        let triggered = touch_speed >= self.touch_speed || acceleration.length() >= self.accel;
        if !triggered {
            return false;
        }
        if let Some(last) = self.last_shake {
            if clock - last < self.cooldown_s {
                return false;
            }
        }
        self.last_shake = Some(clock);
        true
    }

    pub fn reset(&mut self) {
        self.last_shake = None;
    }
}

/// Maps a raw drag vector onto a resisted offset: the length grows
/// logarithmically and never exceeds `max`.
pub fn resisted_offset(raw: Vec2, resistance: f32, max: f32) -> Vec2 {
    let length = raw.length();
    if length <= f32::EPSILON || resistance <= 0.0 {
        return Vec2::ZERO;
    }
    let resisted = (resistance * (1.0 + length / resistance).ln()).min(max);
    raw / length * resisted
}

/// A progress value pushed towards `goal` by gestures and pulled back to
/// `rest` whenever a step passes without any push.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    value: f32,
    rest: f32,
    goal: f32,
    decay_per_s: f32,
    pushed: bool,
}

impl ProgressBar {
    pub fn new(rest: f32, goal: f32, decay_per_s: f32) -> Self {
        Self {
            value: rest,
            rest,
            goal,
            decay_per_s,
            pushed: false,
        }
    }

    /// Moves the value by `amount` in the direction of the goal
    /// (negative amounts move it back).
    pub fn push(&mut self, amount: f32) {
        let direction = (self.goal - self.rest).signum();
        self.value = (self.value + amount * direction).clamp(0.0, 1.0);
        self.pushed = true;
    }

    pub fn step(&mut self, dt: f32) {
        if !self.pushed {
            let decay = self.decay_per_s * dt.max(0.0);
            if self.value < self.rest {
                self.value = (self.value + decay).min(self.rest);
            } else {
                self.value = (self.value - decay).max(self.rest);
            }
        }
        self.pushed = false;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Fraction of the way from rest to goal.
    pub fn progress(&self) -> f32 {
        let span = self.goal - self.rest;
        if span == 0.0 {
            1.0
        } else {
            ((self.value - self.rest) / span).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// True when `swipe` is long enough and within `tolerance_deg` of `expected`.
pub fn swipe_matches(swipe: Vec2, expected: Vec2, min_length: f32, tolerance_deg: f32) -> bool {
    let length = swipe.length();
    let expected_length = expected.length();
    if length < min_length || length <= f32::EPSILON || expected_length <= f32::EPSILON {
        return false;
    }
    let cos = (swipe.dot(expected) / (length * expected_length)).clamp(-1.0, 1.0);
    cos.acos().to_degrees() <= tolerance_deg
}

/// Keeps a dragged point on or inside the ring.
pub fn clamp_to_ring(pos: Vec2, radius: f32) -> Vec2 {
    pos.clamp_length_max(radius.max(0.0))
}

/// Unit direction for a swipe prompt, cycling through the four cardinals.
pub fn prompt_direction(index: usize) -> Vec2 {
    match index % 4 {
        0 => Vec2::Y,
        1 => Vec2::X,
        2 => Vec2::NEG_Y,
        _ => Vec2::NEG_X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_either_sensor_with_cooldown() {
        let mut shake = ShakeDetector::new(6.0, 15.0, 0.25);
        assert!(!shake.update(0.0, 1.0, Vec3::new(0.0, 0.0, 9.8)));
        assert!(shake.update(0.0, 7.0, Vec3::ZERO));
        // Within cooldown, even with the accelerometer spiking.
        assert!(!shake.update(0.1, 0.0, Vec3::new(20.0, 0.0, 0.0)));
        assert!(shake.update(0.3, 0.0, Vec3::new(20.0, 0.0, 0.0)));
    }

    #[test]
    fn test_resisted_offset_is_bounded() {
        let small = resisted_offset(Vec2::new(0.1, 0.0), 0.35, 0.5);
        assert!(small.x > 0.0 && small.x < 0.1);
        let huge = resisted_offset(Vec2::new(0.0, -100.0), 0.35, 0.5);
        assert!((huge.y + 0.5).abs() < 1e-6);
        assert_eq!(resisted_offset(Vec2::ZERO, 0.35, 0.5), Vec2::ZERO);
    }

    #[test]
    fn test_progress_bar_decays_without_push() {
        let mut entry = ProgressBar::new(0.0, 1.0, 0.5);
        entry.push(0.6);
        entry.step(1.0);
        assert!((entry.value() - 0.6).abs() < 1e-6);
        entry.step(1.0);
        assert!((entry.value() - 0.1).abs() < 1e-6);
        entry.step(1.0);
        assert_eq!(entry.value(), 0.0);

        entry.push(2.0);
        assert!(entry.is_complete());
    }

    #[test]
    fn test_exit_bar_runs_downwards() {
        let mut exit = ProgressBar::new(1.0, 0.0, 0.25);
        assert_eq!(exit.value(), 1.0);
        exit.push(0.5);
        assert!((exit.value() - 0.5).abs() < 1e-6);
        assert!((exit.progress() - 0.5).abs() < 1e-6);
        exit.step(0.1);
        exit.step(1.0);
        assert!((exit.value() - 0.75).abs() < 1e-6);
        exit.push(1.0);
        assert!(exit.is_complete());
    }

    #[test]
    fn test_swipe_tolerance() {
        assert!(swipe_matches(Vec2::new(0.1, 1.0), Vec2::Y, 0.3, 45.0));
        assert!(!swipe_matches(Vec2::new(1.0, 0.9), Vec2::Y, 0.3, 45.0));
        assert!(!swipe_matches(Vec2::new(0.0, 0.1), Vec2::Y, 0.3, 45.0));
        assert!(!swipe_matches(Vec2::NEG_Y, Vec2::Y, 0.3, 45.0));
    }

    #[test]
    fn test_clamp_to_ring() {
        let clamped = clamp_to_ring(Vec2::new(0.0, 3.0), 1.0);
        assert!((clamped - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert_eq!(clamp_to_ring(Vec2::new(0.2, 0.2), 1.0), Vec2::new(0.2, 0.2));
    }
}
