//! Headless autoplay: runs a pattern through the engine with ideal input.
//!
//! Used to sanity-check generated patterns and to exercise every mode
//! without a host. The simulation steps a manual clock at a fixed rate and
//! feeds the engine exactly the gestures a perfect player would make.

use crate::input::events::GestureEvent;
use crate::logic::capabilities::{AudioClock, ManualClock};
use crate::models::engine::{ActiveNote, Pattern, PatternValidationError, Track};
use crate::models::settings::{EngineConfig, TrackStyle};
use crate::models::stats::HitStats;
use crate::shared::snapshot::TickReport;
use crate::state::{GameEngine, GameMode};
use glam::Vec2;

/// Simulation step (matches the host loop's tick rate).
const DT: f64 = 1.0 / 200.0;

/// Extra simulated time allowed after the last note before giving up.
const MAX_OVERRUN_S: f64 = 120.0;

/// Length of the synthetic slash used on every flying note.
const SLASH_LENGTH: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayResult {
    pub hit_stats: HitStats,
    pub accuracy: f64,
    pub score: u32,
    pub max_combo: u32,
    /// Every mode change with the audio time at which it happened.
    pub transitions: Vec<(f64, GameMode)>,
    pub final_mode: GameMode,
    /// Audio time at which the run stopped.
    pub end_time: f64,
}

pub struct Autoplay {
    engine: GameEngine,
    clock: ManualClock,
    ticks: u64,
    limit: f64,
    transitions: Vec<(f64, GameMode)>,
}

impl Autoplay {
    pub fn new(config: EngineConfig, pattern: Pattern) -> Result<Self, PatternValidationError> {
        let limit = pattern.duration() + MAX_OVERRUN_S;
        let mut engine = GameEngine::new(config);
        engine.load_pattern(pattern)?;
        Ok(Self {
            engine,
            clock: ManualClock {
                time: 0.0,
                playing: true,
            },
            ticks: 0,
            limit,
            transitions: Vec::new(),
        })
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Runs one tick with ideal input.
    pub fn step(&mut self) -> TickReport {
        let now = self.clock.now();
        let events = self.ideal_inputs(now);
        let report = self.engine.tick(now, &events);
        if let Some(mode) = report.state_changed_to {
            self.transitions.push((now, mode));
        }

        self.ticks += 1;
        // Derived from the tick count so long runs do not drift.
        self.clock.time = self.ticks as f64 * DT;
        report
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished() || self.clock.now() > self.limit
    }

    /// Plays until the pattern is over.
    pub fn run(mut self) -> AutoplayResult {
        while !self.is_finished() {
            self.step();
        }
        if !self.engine.is_finished() {
            log::warn!("AUTOPLAY: gave up at {:.1}s in {:?}", self.clock.now(), self.engine.current_state());
        }

        let stats = self.engine.stats().clone();
        AutoplayResult {
            accuracy: stats.calculate_accuracy(),
            hit_stats: stats,
            score: self.engine.score,
            max_combo: self.engine.max_combo,
            transitions: self.transitions,
            final_mode: self.engine.current_state(),
            end_time: self.clock.now(),
        }
    }

    /// Replays `pattern` as fast as possible and returns the outcome.
    pub fn run_pattern(
        config: EngineConfig,
        pattern: Pattern,
    ) -> Result<AutoplayResult, PatternValidationError> {
        Ok(Self::new(config, pattern)?.run())
    }

    fn ideal_inputs(&self, now: f64) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let engine = &self.engine;

        match engine.current_state() {
            GameMode::Normal | GameMode::Survival => {
                let flight = engine.config().track_style == TrackStyle::Flight;
                self.play_track(Track::Main, flight, now, &mut events);
            }
            GameMode::HyperStream => self.play_track(Track::Hyper, true, now, &mut events),
            GameMode::PhaseEntry => events.push(GestureEvent::PinchDelta(1.0)),
            GameMode::PhaseExit => events.push(GestureEvent::PinchDelta(-1.0)),
            GameMode::ThemeWait => {
                if let Some(direction) = engine.snapshot().swipe_prompt {
                    events.push(GestureEvent::SwipeDir(direction));
                }
            }
            GameMode::Ignition => {
                let radius = engine.config().ring.radius;
                let edge = radius * (1.0 - engine.config().modes.ignition_edge_band);
                let at_edge = engine.snapshot().ember.is_some_and(|e| e.length() >= edge);
                if !at_edge {
                    events.push(GestureEvent::Tap(Vec2::ZERO));
                    events.push(GestureEvent::DragDelta(Vec2::new(0.0, radius)));
                }
            }
            GameMode::Groggy => {}
        }
        events
    }

    fn play_track(&self, track: Track, flight: bool, now: f64, events: &mut Vec<GestureEvent>) {
        let notes: Vec<&ActiveNote> = self
            .engine
            .active_notes()
            .into_iter()
            .filter(|n| n.id.track == track)
            .collect();

        if notes.iter().any(|n| n.held && now >= n.tail_time()) {
            events.push(GestureEvent::TouchUp);
        }

        for note in notes.iter().filter(|n| !n.held && now >= n.target_time) {
            let target = if flight {
                self.engine.config().flight.target(note.descriptor.lane)
            } else {
                Vec2::ZERO
            };

            if flight {
                let slash = Vec2::new(SLASH_LENGTH, 0.0);
                events.push(GestureEvent::Tap(target - slash));
                events.push(GestureEvent::DragDelta(slash));
            } else {
                events.push(GestureEvent::Tap(target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::NoteDescriptor;

    fn pattern(notes: Vec<NoteDescriptor>) -> Pattern {
        Pattern::load(notes, 4).unwrap()
    }

    #[test]
    fn test_empty_pattern_finishes_immediately() {
        let result = Autoplay::run_pattern(EngineConfig::default(), Pattern::empty(4)).unwrap();
        assert_eq!(result.hit_stats, HitStats::new());
        assert_eq!(result.end_time, 0.0);
    }

    #[test]
    fn test_ring_autoplay_is_perfect() {
        let mut notes: Vec<NoteDescriptor> = (0..8)
            .map(|i| NoteDescriptor::tap(2.0 + i as f64 * 0.5, (i % 4) as u8))
            .collect();
        notes.push(NoteDescriptor::hold(6.5, 1, 1.0));
        notes.push(NoteDescriptor::drag(8.0, 2));

        let result = Autoplay::run_pattern(EngineConfig::default(), pattern(notes)).unwrap();
        assert_eq!(result.hit_stats.perfect, 10);
        assert_eq!(result.hit_stats.miss, 0);
        assert_eq!(result.hit_stats.ghost_tap, 0);
        assert_eq!(result.max_combo, 10);
        assert_eq!(result.accuracy, 100.0);
        assert!(result.transitions.is_empty());
    }

    #[test]
    fn test_flight_autoplay_is_perfect() {
        let config = EngineConfig {
            track_style: TrackStyle::Flight,
            ..EngineConfig::default()
        };
        let notes = vec![
            NoteDescriptor::tap(2.0, 0),
            NoteDescriptor::tap(3.0, 3),
            NoteDescriptor::hold(4.0, 1, 1.0),
        ];
        let result = Autoplay::run_pattern(config, pattern(notes)).unwrap();
        assert_eq!(result.hit_stats.perfect, 3);
        assert_eq!(result.hit_stats.miss, 0);
        assert_eq!(result.hit_stats.ghost_tap, 0);
    }

    #[test]
    fn test_full_fire_tour() {
        let mut config = EngineConfig::default();
        config.fire.initial = 0.9;
        let notes = (0..20).map(|i| NoteDescriptor::tap(2.0 + i as f64, 0)).collect();
        let result = Autoplay::run_pattern(config, pattern(notes)).unwrap();

        let modes: Vec<GameMode> = result.transitions.iter().map(|(_, m)| *m).collect();
        for expected in [
            GameMode::PhaseEntry,
            GameMode::HyperStream,
            GameMode::PhaseExit,
            GameMode::Survival,
        ] {
            assert!(modes.contains(&expected), "{expected:?} missing from {modes:?}");
        }
        assert_eq!(result.hit_stats.miss, 0);
        // 48 slashed hyper notes plus the main notes played outside the phase.
        assert!(result.hit_stats.perfect > 48);
        assert!(result.final_mode.plays_main());
    }
}
