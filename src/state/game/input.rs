//! Gesture handling for GameEngine - handle_gesture and per-mode routing

use super::GameEngine;
use crate::input::events::GestureEvent;
use crate::logic::gesture::{clamp_to_ring, resisted_offset, swipe_matches};
use crate::logic::judge::JudgeInput;
use crate::models::engine::{MIN_INPUT_DT_S, Track};
use crate::models::stats::Judgement;
use crate::shared::snapshot::TickReport;
use crate::state::GameMode;
use glam::Vec2;

impl GameEngine {
    /// Handles one queued gesture. `dt` is the time since the previous tick,
    /// used to turn drag deltas into slash speeds.
    pub(crate) fn handle_gesture(&mut self, event: GestureEvent, dt: f64, report: &mut TickReport) {
        match event {
            GestureEvent::Tap(pos) => {
                self.pointer = Some(pos);
                self.on_press(pos, report);
            }
            GestureEvent::DragDelta(delta) => {
                let speed = delta.length() / dt.max(MIN_INPUT_DT_S) as f32;
                self.tick_touch_speed = self.tick_touch_speed.max(speed);
                let pos = self.pointer.unwrap_or(Vec2::ZERO) + delta;
                self.pointer = Some(pos);
                self.on_drag(pos, delta, speed, report);
            }
            GestureEvent::TouchUp => {
                self.pointer = None;
                self.on_release(report);
            }
            GestureEvent::PinchDelta(amount) => self.on_pinch(amount),
            GestureEvent::PinchEnd => {}
            GestureEvent::SwipeDir(direction) => self.on_swipe(direction, report),
        }
    }

    fn on_press(&mut self, pos: Vec2, report: &mut TickReport) {
        let input = JudgeInput::Press { pos, speed: 0.0 };
        match self.mode {
            GameMode::Normal | GameMode::Survival => {
                let ruling = self.main_judge.judge(self.main.active(), &input, self.clock);
                // A touch-down on the flight lanes only starts a slash.
                if ruling.action.is_none() && self.main_judge.hits_on_press() {
                    self.apply_judgement(None, Judgement::GhostTap, report);
                }
                self.apply_ruling(Track::Main, ruling, report);
            }
            GameMode::HyperStream => {
                let ruling = self.hyper_judge.judge(self.hyper.active(), &input, self.clock);
                self.apply_ruling(Track::Hyper, ruling, report);
            }
            GameMode::Ignition => {
                self.ember = clamp_to_ring(pos, self.config.ring.radius);
            }
            _ => {}
        }
    }

    fn on_drag(&mut self, pos: Vec2, delta: Vec2, speed: f32, report: &mut TickReport) {
        let input = JudgeInput::Slide { pos, speed };
        match self.mode {
            GameMode::Normal | GameMode::Survival => {
                let ruling = self.main_judge.judge(self.main.active(), &input, self.clock);
                self.apply_ruling(Track::Main, ruling, report);
            }
            GameMode::HyperStream => {
                let ruling = self.hyper_judge.judge(self.hyper.active(), &input, self.clock);
                self.apply_ruling(Track::Hyper, ruling, report);
            }
            GameMode::Groggy => {
                let modes = &self.config.modes;
                self.drag_total += delta;
                self.drag_offset =
                    resisted_offset(self.drag_total, modes.drag_resistance, modes.drag_max_offset);
            }
            GameMode::Ignition => {
                self.ember = clamp_to_ring(self.ember + delta, self.config.ring.radius);
            }
            _ => {}
        }
    }

    fn on_release(&mut self, report: &mut TickReport) {
        match self.mode {
            GameMode::Normal | GameMode::Survival => {
                let ruling = self.main_judge.release(self.main.active(), self.clock);
                self.apply_ruling(Track::Main, ruling, report);
            }
            GameMode::HyperStream => {
                let ruling = self.hyper_judge.release(self.hyper.active(), self.clock);
                self.apply_ruling(Track::Hyper, ruling, report);
            }
            _ => {}
        }
    }

    fn on_pinch(&mut self, amount: f32) {
        let gain = self.config.modes.pinch_gain;
        match self.mode {
            // Spread to open, pinch in to close.
            GameMode::PhaseEntry => self.pinch.push(amount * gain),
            GameMode::PhaseExit => self.pinch.push(-amount * gain),
            _ => {}
        }
    }

    fn on_swipe(&mut self, direction: Vec2, report: &mut TickReport) {
        if self.mode != GameMode::ThemeWait {
            return;
        }
        let modes = &self.config.modes;
        if swipe_matches(
            direction,
            self.swipe_prompt,
            modes.swipe_min_length,
            modes.swipe_tolerance_deg,
        ) {
            log::info!("ENGINE: theme swipe accepted");
            self.advance_theme(report);
            self.request_transition(GameMode::Normal);
        } else {
            log::debug!("ENGINE: swipe {:?} rejected, expected {:?}", direction, self.swipe_prompt);
        }
    }
}
