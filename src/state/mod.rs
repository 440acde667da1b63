//! Game mode state machine.
//!
//! `GameEngine` drives one active `GameMode` at a time. Every transition
//! runs the exit of the current mode (resolving any held note) before the
//! enter of the next one.

pub mod game;

pub use game::GameEngine;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Regular play on the main pattern.
    Normal,
    /// Stunned: note flow frozen until the spell runs out, shaking earns fuel.
    Groggy,
    /// Pinch out to open the hyper phase.
    PhaseEntry,
    /// Slash through a dense stream of flying notes.
    HyperStream,
    /// Pinch in to close the hyper phase.
    PhaseExit,
    /// Regular play with a constantly draining fire.
    Survival,
    /// Note flow fades out until the player swipes to the next theme.
    ThemeWait,
    /// Fire went out: drag the ember to the ring edge to relight it.
    Ignition,
}

impl GameMode {
    /// Modes in which the main pattern spawns and is judged.
    pub fn plays_main(&self) -> bool {
        matches!(self, GameMode::Normal | GameMode::Survival)
    }
}
