//! Note scheduler: walks a pattern against the audio clock.
//!
//! The scheduler owns the active-note set. Each `advance` spawns every note
//! whose approach window has opened, recomputes all placements from the clock
//! (never from accumulated per-tick deltas) and expires notes that passed
//! their judgment point.

use crate::models::engine::{
    ActiveNote, FlightConfig, NoteId, Pattern, Placement, RingConfig, Track,
};

/// How notes move between spawn and judgment.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Rotation from `ring.spawn_angle_deg` towards `target_deg`.
    Ring { ring: RingConfig, target_deg: f64 },
    /// Straight flight from the origin to the lane target; `grace_s` after
    /// the target time a note is missed.
    Flight { flight: FlightConfig, grace_s: f64 },
}

impl Motion {
    /// Approach time: how long before its target time a note spawns.
    pub fn lookahead(&self) -> f64 {
        match self {
            Motion::Ring { ring, target_deg } => {
                if ring.speed_deg_per_s > 0.0 {
                    (ring.spawn_angle_deg - target_deg) / ring.speed_deg_per_s
                } else {
                    0.0
                }
            }
            Motion::Flight { flight, .. } => flight.flight_time_s,
        }
    }

    fn place(&self, note: &ActiveNote, clock: f64) -> Placement {
        let elapsed = clock - note.spawn_audio_time;
        match self {
            Motion::Ring { ring, .. } => {
                Placement::Angle(ring.spawn_angle_deg - ring.speed_deg_per_s * elapsed)
            }
            Motion::Flight { flight, .. } => {
                let progress = if flight.flight_time_s > 0.0 {
                    (elapsed / flight.flight_time_s).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let target = flight.target(note.descriptor.lane);
                Placement::Position(flight.origin.lerp(target, progress as f32))
            }
        }
    }

    fn tail(&self, note: &ActiveNote, placement: Placement) -> Option<f64> {
        match (self, placement) {
            (Motion::Ring { ring, .. }, Placement::Angle(angle)) if note.descriptor.is_hold() => {
                Some(angle + ring.speed_deg_per_s * note.descriptor.duration)
            }
            _ => None,
        }
    }

    fn hittable(&self, note: &ActiveNote, clock: f64) -> bool {
        match (self, note.placement) {
            (Motion::Ring { ring, target_deg }, Placement::Angle(angle)) => {
                let gate =
                    ring.spawn_angle_deg - ring.hittable_fraction * (ring.spawn_angle_deg - target_deg);
                angle <= gate
            }
            (Motion::Flight { grace_s, .. }, _) => clock >= note.target_time - grace_s,
            _ => false,
        }
    }

    /// Unheld note past its judgment point.
    fn missed(&self, note: &ActiveNote, clock: f64) -> bool {
        match (self, note.placement) {
            (Motion::Ring { ring, .. }, Placement::Angle(angle)) => angle < ring.miss_angle_deg,
            (Motion::Flight { grace_s, .. }, _) => clock > note.target_time + grace_s,
            _ => false,
        }
    }

    /// Held hold whose tail went all the way through.
    fn hold_completed(&self, note: &ActiveNote, clock: f64) -> bool {
        match self {
            Motion::Ring { ring, .. } => note
                .tail
                .is_some_and(|tail| tail < ring.hold_complete_angle_deg),
            Motion::Flight { grace_s, .. } => clock > note.tail_time() + grace_s,
        }
    }
}

/// Whether due notes are spawned or consumed silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPolicy {
    Spawn,
    /// Used while a mode freezes note flow: due notes are passed over.
    Skip,
}

/// Everything that happened during one `advance`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AdvanceReport {
    pub spawned: Vec<NoteId>,
    pub skipped: usize,
    /// Unheld notes that crossed their judgment point.
    pub missed: Vec<ActiveNote>,
    /// Held holds that ran to completion.
    pub completed: Vec<ActiveNote>,
    /// Fading notes that left the playfield (no judgement).
    pub faded: Vec<ActiveNote>,
}

pub struct NoteScheduler {
    track: Track,
    motion: Motion,
    pattern: Option<Pattern>,
    /// Clock value corresponding to pattern time 0.
    origin: f64,
    head_index: usize,
    active: Vec<ActiveNote>,
    fade_s: f64,
}

impl NoteScheduler {
    pub fn new(track: Track, motion: Motion) -> Self {
        Self {
            track,
            motion,
            pattern: None,
            origin: 0.0,
            head_index: 0,
            active: Vec::new(),
            fade_s: 0.5,
        }
    }

    /// Starts `pattern` with its time 0 at clock `origin`.
    /// Any previous pattern and active notes are dropped.
    pub fn load(&mut self, pattern: Pattern, origin: f64) {
        log::debug!(
            "SCHEDULER: {:?} loaded {} notes at origin {:.3}",
            self.track,
            pattern.len(),
            origin
        );
        self.pattern = Some(pattern);
        self.origin = origin;
        self.head_index = 0;
        self.active.clear();
    }

    /// Stops the scheduler; it stays idle until the next `load`.
    pub fn unload(&mut self) -> Vec<ActiveNote> {
        self.pattern = None;
        self.head_index = 0;
        std::mem::take(&mut self.active)
    }

    pub fn advance(&mut self, clock: f64, policy: SpawnPolicy) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let Some(pattern) = &self.pattern else {
            return report;
        };

        let lookahead = self.motion.lookahead();
        while self.head_index < pattern.len() {
            let descriptor = pattern[self.head_index];
            let target_time = self.origin + descriptor.time;
            if clock < target_time - lookahead {
                break;
            }

            match policy {
                SpawnPolicy::Spawn => {
                    let id = NoteId {
                        track: self.track,
                        index: self.head_index,
                    };
                    self.active.push(ActiveNote {
                        id,
                        descriptor,
                        target_time,
                        spawn_audio_time: target_time - lookahead,
                        placement: Placement::Angle(0.0),
                        tail: None,
                        is_hittable: false,
                        held: false,
                        opacity: 1.0,
                        fade_started: None,
                    });
                    report.spawned.push(id);
                    log::trace!("SCHEDULER: spawn {:?} at {:.3}", id, clock);
                }
                SpawnPolicy::Skip => report.skipped += 1,
            }
            self.head_index += 1;
        }

        for note in &mut self.active {
            refresh(&self.motion, self.fade_s, note, clock);
        }

        let mut i = 0;
        while i < self.active.len() {
            let note = &self.active[i];
            if note.held && self.motion.hold_completed(note, clock) {
                report.completed.push(self.active.remove(i));
            } else if !note.held && self.motion.missed(note, clock) {
                let note = self.active.remove(i);
                if note.is_fading() {
                    report.faded.push(note);
                } else {
                    report.missed.push(note);
                }
            } else {
                i += 1;
            }
        }

        report
    }

    /// Starts fading every active note out over `duration_s`.
    pub fn begin_fade(&mut self, clock: f64, duration_s: f64) {
        self.fade_s = duration_s;
        for note in &mut self.active {
            note.fade_started.get_or_insert(clock);
            refresh(&self.motion, self.fade_s, note, clock);
        }
    }

    /// Removes fully faded notes. Walks backwards so removal keeps the
    /// remaining indices valid.
    pub fn prune_faded(&mut self) -> Vec<ActiveNote> {
        let mut pruned = Vec::new();
        for i in (0..self.active.len()).rev() {
            if self.active[i].is_fading() && self.active[i].opacity <= 0.0 {
                pruned.push(self.active.remove(i));
            }
        }
        pruned.reverse();
        pruned
    }

    pub fn remove(&mut self, id: NoteId) -> Option<ActiveNote> {
        let pos = self.active.iter().position(|n| n.id == id)?;
        Some(self.active.remove(pos))
    }

    pub fn set_held(&mut self, id: NoteId, held: bool) -> bool {
        match self.active.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.held = held;
                true
            }
            None => false,
        }
    }

    pub fn held_note(&self) -> Option<&ActiveNote> {
        self.active.iter().find(|n| n.held)
    }

    /// Drops every active note without judging it.
    pub fn clear(&mut self) -> Vec<ActiveNote> {
        std::mem::take(&mut self.active)
    }

    pub fn active(&self) -> &[ActiveNote] {
        &self.active
    }

    pub fn head_index(&self) -> usize {
        self.head_index
    }

    pub fn lookahead(&self) -> f64 {
        self.motion.lookahead()
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn is_loaded(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// All notes spawned (or skipped) and none left on screen.
    pub fn is_exhausted(&self) -> bool {
        match &self.pattern {
            Some(pattern) => self.head_index >= pattern.len() && self.active.is_empty(),
            None => true,
        }
    }
}

fn refresh(motion: &Motion, fade_s: f64, note: &mut ActiveNote, clock: f64) {
    note.placement = motion.place(note, clock);
    note.tail = motion.tail(note, note.placement);
    note.opacity = match note.fade_started {
        Some(start) if fade_s > 0.0 => (1.0 - (clock - start) / fade_s).clamp(0.0, 1.0) as f32,
        Some(_) => 0.0,
        None => 1.0,
    };
    note.is_hittable = !note.is_fading() && motion.hittable(note, clock);
}
