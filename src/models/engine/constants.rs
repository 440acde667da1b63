//! Design constants shared by the scheduler, the judge and the config defaults.

/// Angle (degrees) at which ring notes are judged.
pub const TARGET_ANGLE_DEG: f64 = 90.0;
/// Angle (degrees) a ring note starts from when it spawns.
pub const SPAWN_ANGLE_DEG: f64 = 450.0;
/// Rotation speed of ring notes (degrees per second).
pub const ROTATION_SPEED_DEG: f64 = 90.0;
/// Fraction of the approach arc a note must cover before it can be hit.
pub const HITTABLE_ARC_FRACTION: f64 = 0.5;

pub const PERFECT_WINDOW_DEG: f64 = 10.0;
pub const GOOD_WINDOW_DEG: f64 = 20.0;
/// Unheld ring notes below this angle are expired as misses.
pub const MISS_ANGLE_DEG: f64 = 70.0;

/// Tail window for hold releases (degrees around the target).
pub const HOLD_RELEASE_WINDOW_DEG: f64 = 30.0;
/// A tail still above this angle on release is a failed (too early) hold.
pub const HOLD_EARLY_RELEASE_DEG: f64 = 120.0;
/// A held ring hold completes on its own once its tail drops below this angle.
pub const HOLD_AUTO_COMPLETE_DEG: f64 = 30.0;

/// Temporal window (seconds) for osu-style judging.
pub const HIT_THRESHOLD_S: f64 = 0.2;
pub const PERFECT_THRESHOLD_S: f64 = 0.08;
/// Maximum pointer distance to a flying note for a slash to count.
pub const HIT_DISTANCE: f32 = 0.25;
/// Minimum pointer speed (playfield units per second) for a slash.
pub const MIN_SLASH_SPEED: f32 = 2.0;
/// Time a flying note takes from its spawn point to its target.
pub const FLIGHT_TIME_S: f64 = 1.0;

/// Radius of the ring in playfield units.
pub const RING_RADIUS: f32 = 1.0;
/// Number of ring tracks a pattern may address.
pub const DEFAULT_LANE_COUNT: u8 = 4;

/// Shortest tick delta used when deriving pointer speeds.
pub const MIN_INPUT_DT_S: f64 = 1.0 / 240.0;
