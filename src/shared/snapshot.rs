//! Per-tick reports and snapshots handed from the engine to the host.
//!
//! Reports describe what changed during one tick; snapshots are immutable
//! captures of the whole observable state, suitable for sending to a
//! render thread.

use crate::logic::fire::FireEvent;
use crate::models::engine::{ActiveNote, NoteDescriptor, NoteId};
use crate::models::stats::{HitStats, Judgement};
use crate::state::GameMode;
use glam::Vec2;

/// Ask the host to create a view for a freshly spawned note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub id: NoteId,
    pub descriptor: NoteDescriptor,
}

/// One judgement produced during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgeResult {
    /// Judged note, `None` for ghost taps.
    pub id: Option<NoteId>,
    pub judgement: Judgement,
    /// Audio time at which the judgement happened.
    pub clock: f64,
}

/// Everything the host needs to react to after one `tick`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawn_requests: Vec<SpawnRequest>,
    /// Notes whose views must be released (hit, missed, faded or cleared).
    pub release_requests: Vec<NoteId>,
    pub judge_results: Vec<JudgeResult>,
    pub state_changed_to: Option<GameMode>,
    pub fire_events: Vec<FireEvent>,
    /// New theme index after a theme swap.
    pub theme_changed: Option<usize>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self == &TickReport::default()
    }
}

/// Snapshot of the engine state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    /// Audio clock of the last tick, in seconds.
    pub clock: f64,
    pub mode: GameMode,
    /// Notes currently on screen (main and hyper tracks).
    pub notes: Vec<ActiveNote>,

    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub accuracy: f64,
    pub hit_stats: HitStats,
    pub last_judgement: Option<Judgement>,

    pub fuel: f32,
    pub theme_index: usize,

    /// Progress of the current mode's gesture (pinch bar, ignition gauge), 0..1.
    pub mode_progress: Option<f32>,
    /// Resisted log offset while groggy.
    pub drag_offset: Vec2,
    /// Ember position while igniting.
    pub ember: Option<Vec2>,
    /// Direction the player must swipe while a theme swap is pending.
    pub swipe_prompt: Option<Vec2>,
}
