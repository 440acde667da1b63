//! Snapshot creation for GameEngine - snapshot

use super::GameEngine;
use crate::shared::snapshot::EngineSnapshot;
use crate::state::GameMode;
use glam::Vec2;

impl GameEngine {
    /// Creates a snapshot of the current game state for rendering.
    pub fn snapshot(&self) -> EngineSnapshot {
        let mode_progress = match self.mode {
            GameMode::PhaseEntry | GameMode::PhaseExit => Some(self.pinch.value()),
            GameMode::Ignition => Some(self.ignition.progress()),
            GameMode::Groggy | GameMode::ThemeWait => self.deadline.map(|at| {
                let total = match self.mode {
                    GameMode::Groggy => self.config.modes.groggy_duration_s,
                    _ => self.config.modes.theme_deadline_s,
                };
                if total > 0.0 {
                    (1.0 - (at - self.clock) / total).clamp(0.0, 1.0) as f32
                } else {
                    1.0
                }
            }),
            _ => None,
        };

        EngineSnapshot {
            clock: self.clock,
            mode: self.mode,
            notes: self.active_notes().into_iter().cloned().collect(),
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            accuracy: self.hit_stats.calculate_accuracy(),
            hit_stats: self.hit_stats.clone(),
            last_judgement: self.last_judgement,
            fuel: self.fire.ratio(),
            theme_index: self.theme_index,
            mode_progress,
            drag_offset: if self.mode == GameMode::Groggy {
                self.drag_offset
            } else {
                Vec2::ZERO
            },
            ember: (self.mode == GameMode::Ignition).then_some(self.ember),
            swipe_prompt: (self.mode == GameMode::ThemeWait).then_some(self.swipe_prompt),
        }
    }
}
