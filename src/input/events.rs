//! Classified gesture events consumed by the engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A gesture already recognized by the host's input layer.
///
/// Positions and deltas are in playfield units (ring radius = 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Finger down at a position.
    Tap(Vec2),
    /// Finger moved by a delta since the previous event.
    DragDelta(Vec2),
    /// Pinch scale change, positive when spreading.
    PinchDelta(f32),
    PinchEnd,
    /// Completed swipe, as a direction vector.
    SwipeDir(Vec2),
    /// Finger lifted.
    TouchUp,
}
