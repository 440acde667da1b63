//! Capabilities the engine consumes from its host.

use crate::models::engine::{NoteDescriptor, NoteId};
use glam::Vec3;

/// Monotonic song-position clock, in seconds.
pub trait AudioClock {
    fn now(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Creates and recycles the visual representation of notes.
pub trait NoteViewFactory {
    type Handle;

    /// Returns `None` when no view could be acquired; the engine keeps
    /// judging the note regardless.
    fn spawn(&mut self, id: NoteId, descriptor: &NoteDescriptor) -> Option<Self::Handle>;
    fn release(&mut self, handle: Self::Handle);
}

/// Device accelerometer, read while the player shakes off a groggy spell.
pub trait MotionSensor {
    fn device_acceleration(&self) -> Vec3;
}

/// Sensor for hosts without an accelerometer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMotion;

impl MotionSensor for NoMotion {
    fn device_acceleration(&self) -> Vec3 {
        Vec3::ZERO
    }
}

/// Clock driven by hand, used by headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    pub time: f64,
    pub playing: bool,
}

impl ManualClock {
    pub fn advance(&mut self, dt: f64) {
        if self.playing {
            self.time += dt;
        }
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        self.time
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
