//! Playfield geometry for the two note motions.

use crate::models::engine::constants::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ring mode: notes rotate from `spawn_angle_deg` down to the target angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub spawn_angle_deg: f64,
    pub speed_deg_per_s: f64,
    pub hittable_fraction: f64,
    pub miss_angle_deg: f64,
    pub hold_complete_angle_deg: f64,
    pub radius: f32,
    pub lanes: u8,
}

impl RingConfig {
    pub fn new() -> Self {
        Self {
            spawn_angle_deg: SPAWN_ANGLE_DEG,
            speed_deg_per_s: ROTATION_SPEED_DEG,
            hittable_fraction: HITTABLE_ARC_FRACTION,
            miss_angle_deg: MISS_ANGLE_DEG,
            hold_complete_angle_deg: HOLD_AUTO_COMPLETE_DEG,
            radius: RING_RADIUS,
            lanes: DEFAULT_LANE_COUNT,
        }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Flight mode: notes fly from `origin` to their lane target in `flight_time_s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub flight_time_s: f64,
    pub origin: Vec2,
    pub lane_targets: Vec<Vec2>,
}

impl FlightConfig {
    pub fn new() -> Self {
        Self {
            flight_time_s: FLIGHT_TIME_S,
            origin: Vec2::new(0.0, -1.0),
            lane_targets: vec![
                Vec2::new(-0.6, 0.4),
                Vec2::new(-0.2, 0.6),
                Vec2::new(0.2, 0.6),
                Vec2::new(0.6, 0.4),
            ],
        }
    }

    pub fn lanes(&self) -> u8 {
        self.lane_targets.len().min(u8::MAX as usize) as u8
    }

    /// Target of `lane`, falling back to the origin for unknown lanes.
    pub fn target(&self, lane: u8) -> Vec2 {
        self.lane_targets
            .get(lane as usize)
            .copied()
            .unwrap_or(self.origin)
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self::new()
    }
}
