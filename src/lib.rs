//! Rhythm scheduling and hit-judgment core.
//!
//! Notes travel toward a judgment point either around a ring or along a
//! flight path. The engine schedules them against an audio clock, judges
//! gestures, burns fire fuel on misses and walks through the arcade modes.
//! Patterns are authored offline from audio by spectral-flux onset
//! detection.

pub mod analysis;
pub mod input;
pub mod logic;
pub mod models;
pub mod shared;
pub mod state;
pub mod storage;
pub mod system;
