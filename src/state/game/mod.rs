//! Core gameplay engine.
//!
//! The `GameEngine` owns the note schedulers, the judges and the fire
//! service, and runs the mode state machine. Each `tick` runs, in order:
//! 1. Note scheduling against the audio clock
//! 2. Judgment of the gestures queued since the last tick
//! 3. The current mode's timers and gesture progress
//! 4. Fire events
//!
//! At most one mode transition happens per tick.

mod input;
mod modes;
mod notes;
mod snapshot;
mod transitions;

use crate::analysis::generate_stream;
use crate::input::events::GestureEvent;
use crate::logic::capabilities::{MotionSensor, NoMotion};
use crate::logic::fire::FireService;
use crate::logic::gesture::{ProgressBar, ShakeDetector};
use crate::logic::judge::HitJudge;
use crate::logic::scheduler::{Motion, NoteScheduler};
use crate::models::engine::{ActiveNote, Pattern, PatternValidationError, Track};
use crate::models::settings::{EngineConfig, TrackStyle};
use crate::models::stats::{HitStats, Judgement};
use crate::shared::snapshot::TickReport;
use crate::state::GameMode;
use glam::Vec2;

/// Main gameplay engine: schedulers, judges, fire and mode state machine.
pub struct GameEngine {
    pub(crate) config: EngineConfig,

    pub(crate) mode: GameMode,
    /// Mode to resume once the fire is relit.
    pub(crate) resume_mode: GameMode,
    pending_transition: Option<GameMode>,

    pub(crate) main: NoteScheduler,
    pub(crate) hyper: NoteScheduler,
    pub(crate) main_judge: HitJudge,
    pub(crate) hyper_judge: HitJudge,
    hyper_pattern: Option<Pattern>,
    pub(crate) fire: FireService,
    motion_sensor: Box<dyn MotionSensor + Send>,

    /// Current score.
    pub score: u32,
    /// Current combo count.
    pub combo: u32,
    /// Maximum combo achieved.
    pub max_combo: u32,
    /// Hit statistics.
    pub hit_stats: HitStats,
    /// Judgement of the last judged input or note.
    pub last_judgement: Option<Judgement>,
    /// Hits since the last groggy spell (or combo break).
    pub(crate) groggy_streak: u32,
    pub(crate) groggy_requested: bool,
    /// A full tank that Normal has not acted on yet.
    pub(crate) full_pending: bool,

    pub(crate) theme_index: usize,
    pub(crate) next_theme_at: Option<f64>,
    /// Number of theme swaps prompted so far; picks the swipe direction.
    pub(crate) theme_prompts: usize,

    /// Audio clock of the current tick.
    pub(crate) clock: f64,
    last_tick: Option<f64>,

    /// Current touch position, `None` while no finger is down.
    pub(crate) pointer: Option<Vec2>,
    /// Fastest drag seen during the current tick.
    pub(crate) tick_touch_speed: f32,

    pub(crate) deadline: Option<f64>,
    pub(crate) shake: ShakeDetector,
    pub(crate) drag_total: Vec2,
    pub(crate) drag_offset: Vec2,
    pub(crate) swipe_prompt: Vec2,
    pub(crate) pinch: ProgressBar,
    pub(crate) ignition: ProgressBar,
    pub(crate) ember: Vec2,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        let (main_motion, main_judge) = match config.track_style {
            TrackStyle::Ring => (
                Motion::Ring {
                    ring: config.ring.clone(),
                    target_deg: config.judge.angular.target_deg,
                },
                HitJudge::Angular(config.judge.angular),
            ),
            TrackStyle::Flight => (
                Motion::Flight {
                    flight: config.flight.clone(),
                    grace_s: config.judge.temporal.hit_threshold_s,
                },
                HitJudge::Temporal(config.judge.temporal),
            ),
        };
        let hyper_motion = Motion::Flight {
            flight: config.flight.clone(),
            grace_s: config.judge.temporal.hit_threshold_s,
        };

        let modes = &config.modes;
        let shake = ShakeDetector::new(modes.shake_touch_speed, modes.shake_accel, modes.shake_cooldown_s);
        let pinch = ProgressBar::new(0.0, 1.0, modes.pinch_decay_per_s);
        let ignition = ProgressBar::new(0.0, 1.0, modes.ignition_decay_per_s);

        Self {
            mode: GameMode::Normal,
            resume_mode: GameMode::Normal,
            pending_transition: None,
            main: NoteScheduler::new(Track::Main, main_motion),
            hyper: NoteScheduler::new(Track::Hyper, hyper_motion),
            main_judge,
            hyper_judge: HitJudge::Temporal(config.judge.temporal),
            hyper_pattern: None,
            fire: FireService::new(config.fire),
            motion_sensor: Box::new(NoMotion),
            score: 0,
            combo: 0,
            max_combo: 0,
            hit_stats: HitStats::new(),
            last_judgement: None,
            groggy_streak: 0,
            groggy_requested: false,
            full_pending: false,
            theme_index: 0,
            next_theme_at: None,
            theme_prompts: 0,
            clock: 0.0,
            last_tick: None,
            pointer: None,
            tick_touch_speed: 0.0,
            deadline: None,
            shake,
            drag_total: Vec2::ZERO,
            drag_offset: Vec2::ZERO,
            swipe_prompt: Vec2::Y,
            pinch,
            ignition,
            ember: Vec2::ZERO,
            config,
        }
    }

    /// Uses `sensor` for accelerometer-based shake detection.
    pub fn with_motion_sensor(mut self, sensor: impl MotionSensor + Send + 'static) -> Self {
        self.motion_sensor = Box::new(sensor);
        self
    }

    /// Loads the main pattern, with its time 0 at audio time 0.
    ///
    /// Rejects patterns using lanes the main playfield does not have.
    pub fn load_pattern(&mut self, pattern: Pattern) -> Result<(), PatternValidationError> {
        check_lanes(&pattern, self.config.main_lanes())?;
        log::info!(
            "ENGINE: Loaded pattern {} ({} notes, {:.1}s)",
            pattern.fingerprint(),
            pattern.len(),
            pattern.duration()
        );
        self.main.load(pattern, 0.0);
        self.next_theme_at = self.config.modes.theme_interval_s;
        Ok(())
    }

    /// Sets the stream played by the next hyper phases. Without one, a
    /// stream is generated when the phase starts.
    pub fn load_hyper_pattern(&mut self, pattern: Pattern) -> Result<(), PatternValidationError> {
        check_lanes(&pattern, self.config.flight.lanes())?;
        self.hyper_pattern = Some(pattern);
        Ok(())
    }

    /// Advances the engine to `clock`, judging `events` queued since the last tick.
    pub fn tick(&mut self, clock: f64, events: &[GestureEvent]) -> TickReport {
        let dt = self.last_tick.map_or(0.0, |last| (clock - last).max(0.0));
        self.last_tick = Some(clock);
        self.clock = clock;
        self.tick_touch_speed = 0.0;

        let mut report = TickReport::default();

        // 1. Scheduling
        self.advance_notes(&mut report);

        // 2. Queued input
        for event in events {
            self.handle_gesture(*event, dt, &mut report);
        }

        // 3. Mode timers and gesture progress
        self.update_mode(dt, &mut report);

        // 4. Fire events
        let fire_events = self.fire.drain_events();
        for event in &fire_events {
            self.handle_fire_event(*event);
        }
        report.fire_events.extend(fire_events);

        self.apply_transition(&mut report);
        report
    }

    /// Notes currently on screen, main track first.
    pub fn active_notes(&self) -> Vec<&ActiveNote> {
        self.main.active().iter().chain(self.hyper.active()).collect()
    }

    pub fn current_state(&self) -> GameMode {
        self.mode
    }

    pub fn fuel_ratio(&self) -> f32 {
        self.fire.ratio()
    }

    pub fn stats(&self) -> &HitStats {
        &self.hit_stats
    }

    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Requests a groggy spell; honored on the next tick spent in `Normal`.
    pub fn request_groggy(&mut self) {
        self.groggy_requested = true;
    }

    /// Switches to `mode` immediately, running the usual exit and enter.
    pub fn force_transition(&mut self, mode: GameMode) -> TickReport {
        let mut report = TickReport::default();
        self.pending_transition = None;
        self.request_transition(mode);
        self.apply_transition(&mut report);
        report
    }

    /// True once the main pattern has been fully played.
    pub fn is_finished(&self) -> bool {
        self.main.is_loaded() && self.main.is_exhausted() && self.mode.plays_main()
    }

    /// Queues a transition; the first request of a tick wins. Returns whether
    /// `to` is now the queued transition.
    pub(crate) fn request_transition(&mut self, to: GameMode) -> bool {
        if self.pending_transition.is_none() && to != self.mode {
            self.pending_transition = Some(to);
        }
        self.pending_transition == Some(to)
    }

    /// Stream for a hyper phase: the loaded one or a freshly generated one.
    pub(crate) fn hyper_stream(&self) -> Pattern {
        match &self.hyper_pattern {
            Some(pattern) => pattern.clone(),
            None => {
                let modes = &self.config.modes;
                generate_stream(
                    modes.hyper_duration_s,
                    modes.hyper_notes_per_s,
                    modes.hyper_lead_in_s,
                    self.config.flight.lanes(),
                    modes.seed.wrapping_add(self.theme_prompts as u64),
                )
            }
        }
    }

    fn apply_transition(&mut self, report: &mut TickReport) {
        let Some(to) = self.pending_transition.take() else {
            return;
        };
        let from = self.mode;
        self.exit_mode(report);
        self.mode = to;
        self.enter_mode(from, report);
        log::info!("ENGINE: {:?} -> {:?} at {:.3}s", from, to, self.clock);
        report.state_changed_to = Some(to);
    }
}

fn check_lanes(pattern: &Pattern, lanes: u8) -> Result<(), PatternValidationError> {
    match pattern.iter().position(|n| n.lane >= lanes) {
        Some(index) => Err(PatternValidationError::LaneOutOfRange {
            index,
            lane: pattern[index].lane,
            lane_count: lanes,
        }),
        None => Ok(()),
    }
}
