//! Per-mode updates - timers, gesture progress and fire reactions

use super::GameEngine;
use crate::logic::fire::FireEvent;
use crate::shared::snapshot::TickReport;
use crate::state::GameMode;

impl GameEngine {
    pub(crate) fn update_mode(&mut self, dt: f64, report: &mut TickReport) {
        let dt_f32 = dt as f32;
        match self.mode {
            GameMode::Normal => {
                if self.fire.is_extinguished() {
                    self.request_transition(GameMode::Ignition);
                }
                if self.full_pending {
                    // Fuel spent since the tank filled cancels the phase.
                    if self.fire.ratio() >= 1.0 {
                        self.request_transition(GameMode::PhaseEntry);
                    } else {
                        self.full_pending = false;
                    }
                }
                let combo_due = self
                    .config
                    .modes
                    .groggy_combo_trigger
                    .is_some_and(|n| n > 0 && self.groggy_streak >= n);
                if self.groggy_requested || combo_due {
                    self.request_transition(GameMode::Groggy);
                }
                if self.next_theme_at.is_some_and(|at| self.clock >= at) {
                    self.request_transition(GameMode::ThemeWait);
                }
            }
            GameMode::Survival => {
                self.fire.drain(self.config.fire.survival_drain_per_s * dt_f32);
                if self.fire.is_extinguished() {
                    self.request_transition(GameMode::Ignition);
                }
            }
            GameMode::Groggy => {
                let acceleration = self.motion_sensor.device_acceleration();
                if self.shake.update(self.clock, self.tick_touch_speed, acceleration) {
                    log::debug!("ENGINE: shake at {:.3}s", self.clock);
                    self.fire.add_fuel(self.config.fire.shake_gain);
                }
                if self.deadline_passed() {
                    self.request_transition(GameMode::Normal);
                }
            }
            GameMode::ThemeWait => {
                if self.deadline_passed() {
                    log::info!("ENGINE: theme swipe timed out, forcing swap");
                    self.fire.drain(self.config.fire.theme_timeout_penalty);
                    self.advance_theme(report);
                    self.request_transition(GameMode::Normal);
                }
            }
            GameMode::PhaseEntry => {
                self.pinch.step(dt_f32);
                if self.pinch.is_complete() {
                    self.request_transition(GameMode::HyperStream);
                }
            }
            GameMode::PhaseExit => {
                self.pinch.step(dt_f32);
                if self.pinch.is_complete() {
                    self.request_transition(GameMode::Survival);
                }
            }
            GameMode::HyperStream => {
                if self.hyper.is_exhausted() {
                    self.request_transition(GameMode::PhaseExit);
                }
            }
            GameMode::Ignition => {
                let radius = self.config.ring.radius;
                let edge = radius * (1.0 - self.config.modes.ignition_edge_band);
                if self.pointer.is_some() && self.ember.length() >= edge {
                    self.ignition.push(self.config.modes.ignition_fill_per_s * dt_f32);
                }
                self.ignition.step(dt_f32);
                if self.ignition.is_complete() {
                    self.fire.revive();
                    self.request_transition(self.resume_mode);
                }
            }
        }
    }

    pub(crate) fn handle_fire_event(&mut self, event: FireEvent) {
        match (event, self.mode) {
            (FireEvent::Full, GameMode::Normal) => {
                if !self.request_transition(GameMode::PhaseEntry) {
                    self.full_pending = true;
                }
            }
            (FireEvent::Full, GameMode::Survival) => {
                self.request_transition(GameMode::Normal);
            }
            // Both spells hand back to Normal, which starts the phase then.
            (FireEvent::Full, GameMode::Groggy | GameMode::ThemeWait) => self.full_pending = true,
            (FireEvent::Extinguished, _) => {
                self.full_pending = false;
                if matches!(self.mode, GameMode::Normal | GameMode::Survival) {
                    self.request_transition(GameMode::Ignition);
                }
            }
            _ => {}
        }
    }

    /// Moves to the next theme and reports it.
    pub(crate) fn advance_theme(&mut self, report: &mut TickReport) {
        self.theme_index = self.config.themes.next_index(self.theme_index);
        report.theme_changed = Some(self.theme_index);
        if let Some(theme) = self.config.themes.get(self.theme_index) {
            log::info!("ENGINE: theme -> {}", theme.name);
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|at| self.clock >= at)
    }
}
