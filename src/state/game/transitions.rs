//! Mode transitions - exit_mode and enter_mode

use super::GameEngine;
use crate::logic::gesture::{ProgressBar, prompt_direction};
use crate::models::engine::Track;
use crate::shared::snapshot::TickReport;
use crate::state::GameMode;
use glam::Vec2;

impl GameEngine {
    /// Leaves the current mode. Any held note is resolved here, exactly once,
    /// before the next mode starts.
    pub(crate) fn exit_mode(&mut self, report: &mut TickReport) {
        self.resolve_held(Track::Main, report);
        self.resolve_held(Track::Hyper, report);

        match self.mode {
            GameMode::Groggy => {
                self.drag_total = Vec2::ZERO;
                self.drag_offset = Vec2::ZERO;
            }
            GameMode::ThemeWait => {
                // Whatever is still fading goes away unjudged.
                self.clear_track(Track::Main, report);
                let interval = self.config.modes.theme_interval_s;
                self.next_theme_at = interval.map(|i| self.clock + i);
            }
            GameMode::HyperStream => self.clear_track(Track::Hyper, report),
            _ => {}
        }
        self.deadline = None;
    }

    /// Starts the (already switched) current mode, coming from `from`.
    pub(crate) fn enter_mode(&mut self, from: GameMode, report: &mut TickReport) {
        let modes = &self.config.modes;
        match self.mode {
            GameMode::Normal | GameMode::Survival => {}
            GameMode::Groggy => {
                self.deadline = Some(self.clock + modes.groggy_duration_s);
                self.groggy_requested = false;
                self.groggy_streak = 0;
                self.shake.reset();
                self.clear_track(Track::Main, report);
            }
            GameMode::ThemeWait => {
                self.deadline = Some(self.clock + modes.theme_deadline_s);
                self.swipe_prompt = prompt_direction(self.theme_prompts);
                self.theme_prompts += 1;
                self.main.begin_fade(self.clock, modes.theme_fade_s);
            }
            GameMode::PhaseEntry => {
                self.full_pending = false;
                self.pinch = ProgressBar::new(0.0, 1.0, modes.pinch_decay_per_s);
                self.clear_track(Track::Main, report);
            }
            GameMode::HyperStream => {
                let stream = self.hyper_stream();
                log::info!("ENGINE: hyper stream of {} notes", stream.len());
                self.clear_track(Track::Main, report);
                self.hyper.load(stream, self.clock);
            }
            GameMode::PhaseExit => {
                self.pinch = ProgressBar::new(1.0, 0.0, self.config.modes.pinch_decay_per_s);
            }
            GameMode::Ignition => {
                self.resume_mode = if from.plays_main() {
                    from
                } else {
                    GameMode::Normal
                };
                self.ember = Vec2::ZERO;
                self.ignition = ProgressBar::new(0.0, 1.0, modes.ignition_decay_per_s);
                self.clear_track(Track::Main, report);
            }
        }
    }
}
