//! Hit judgment against the active-note set.
//!
//! The judge never mutates notes. It inspects the scheduler's active set and
//! answers with a verdict plus an instruction telling the owner what to do
//! with the note it matched.

use crate::models::engine::{
    ActiveNote, AngularWindow, NoteId, NoteKind, Placement, ReleaseOutcome, TemporalWindow,
};
use crate::models::stats::{HitTier, Judgement};
use glam::Vec2;
use ordered_float::OrderedFloat;

/// Outcome of a single input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing matched.
    None,
    Hit(HitTier),
    Miss,
}

impl Verdict {
    pub fn judgement(&self) -> Option<Judgement> {
        match self {
            Verdict::None => None,
            Verdict::Hit(tier) => Some((*tier).into()),
            Verdict::Miss => Some(Judgement::Miss),
        }
    }
}

/// What the scheduler should do with the matched note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Remove(NoteId),
    BeginHold(NoteId),
    ReleaseHold(NoteId),
}

impl NoteAction {
    pub fn id(&self) -> NoteId {
        match self {
            NoteAction::Remove(id) | NoteAction::BeginHold(id) | NoteAction::ReleaseHold(id) => {
                *id
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruling {
    pub verdict: Verdict,
    pub action: Option<NoteAction>,
}

impl Ruling {
    pub const NONE: Ruling = Ruling {
        verdict: Verdict::None,
        action: None,
    };
}

/// A classified touch, already positioned in playfield units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JudgeInput {
    /// Touch-down.
    Press { pos: Vec2, speed: f32 },
    /// Finger moving across the playfield at `speed` units per second.
    Slide { pos: Vec2, speed: f32 },
}

impl JudgeInput {
    fn pos(&self) -> Vec2 {
        match self {
            JudgeInput::Press { pos, .. } | JudgeInput::Slide { pos, .. } => *pos,
        }
    }

    fn speed(&self) -> f32 {
        match self {
            JudgeInput::Press { speed, .. } | JudgeInput::Slide { speed, .. } => *speed,
        }
    }

    /// Slides only catch drag-style ring notes; flying notes of any kind
    /// are cut by a slash.
    fn accepts(&self, note: &ActiveNote) -> bool {
        match self {
            JudgeInput::Press { .. } => true,
            JudgeInput::Slide { .. } => {
                note.placement.position().is_some()
                    || matches!(note.descriptor.kind, NoteKind::Drag | NoteKind::Hyper)
            }
        }
    }
}

/// Judging strategy, picked by the playfield the notes live on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitJudge {
    /// Ring notes, judged by their angle to the target.
    Angular(AngularWindow),
    /// Flying notes, judged by time and pointer geometry.
    Temporal(TemporalWindow),
}

impl HitJudge {
    /// Judges one input against `notes`. Exactly one verdict is produced.
    pub fn judge(&self, notes: &[ActiveNote], input: &JudgeInput, clock: f64) -> Ruling {
        let candidates = notes
            .iter()
            .filter(|n| n.is_hittable && !n.held && !n.is_fading())
            .filter(|n| input.accepts(n));

        let best = match self {
            HitJudge::Angular(window) => candidates
                .filter_map(|n| {
                    let delta = window.delta(n.placement.angle()?);
                    window.judge(delta).map(|tier| (n, delta, tier))
                })
                .min_by_key(|(_, delta, _)| OrderedFloat(*delta)),
            HitJudge::Temporal(window) => candidates
                .filter(|n| self.reaches(window, n, input))
                .filter_map(|n| {
                    let diff = clock - n.target_time;
                    window.judge(diff).map(|tier| (n, diff.abs(), tier))
                })
                .min_by_key(|(_, diff, _)| OrderedFloat(*diff)),
        };

        match best {
            Some((note, _, tier)) => {
                let action = if note.descriptor.is_hold() {
                    NoteAction::BeginHold(note.id)
                } else {
                    NoteAction::Remove(note.id)
                };
                Ruling {
                    verdict: Verdict::Hit(tier),
                    action: Some(action),
                }
            }
            None => Ruling::NONE,
        }
    }

    /// Judges the release of whichever note is currently held.
    pub fn release(&self, notes: &[ActiveNote], clock: f64) -> Ruling {
        match notes.iter().find(|n| n.held) {
            Some(note) => self.force_resolve(note, clock),
            None => Ruling::NONE,
        }
    }

    /// Resolves a held note with the release rules, whatever its state.
    pub fn force_resolve(&self, note: &ActiveNote, clock: f64) -> Ruling {
        let outcome = match self {
            HitJudge::Angular(window) => {
                let tail = note
                    .tail
                    .or_else(|| note.placement.angle())
                    .unwrap_or(window.target_deg);
                window.judge_release(tail)
            }
            HitJudge::Temporal(window) => window.judge_release(note.tail_time() - clock),
        };

        let verdict = match outcome {
            ReleaseOutcome::Success(tier) => Verdict::Hit(tier),
            ReleaseOutcome::Failure => Verdict::Miss,
        };
        Ruling {
            verdict,
            action: Some(NoteAction::ReleaseHold(note.id)),
        }
    }

    /// Whether a touch-down alone can hit. Flying notes need a slash.
    pub fn hits_on_press(&self) -> bool {
        matches!(self, HitJudge::Angular(_))
    }

    /// A flying note must be cut: pointer close enough and moving fast enough.
    fn reaches(&self, window: &TemporalWindow, note: &ActiveNote, input: &JudgeInput) -> bool {
        match note.placement {
            Placement::Position(p) => {
                p.distance(input.pos()) <= window.hit_distance
                    && input.speed() >= window.min_slash_speed
            }
            Placement::Angle(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::{NoteDescriptor, Track};

    fn ring_note(index: usize, angle: f64) -> ActiveNote {
        ActiveNote {
            id: NoteId {
                track: Track::Main,
                index,
            },
            descriptor: NoteDescriptor::tap(4.0, 0),
            target_time: 4.0,
            spawn_audio_time: 0.0,
            placement: Placement::Angle(angle),
            tail: None,
            is_hittable: angle <= 270.0,
            held: false,
            opacity: 1.0,
            fade_started: None,
        }
    }

    fn flight_note(descriptor: NoteDescriptor, pos: Vec2) -> ActiveNote {
        ActiveNote {
            id: NoteId {
                track: Track::Hyper,
                index: 0,
            },
            descriptor,
            target_time: descriptor.time,
            spawn_audio_time: descriptor.time - 1.0,
            placement: Placement::Position(pos),
            tail: None,
            is_hittable: true,
            held: false,
            opacity: 1.0,
            fade_started: None,
        }
    }

    fn press() -> JudgeInput {
        JudgeInput::Press {
            pos: Vec2::ZERO,
            speed: 0.0,
        }
    }

    #[test]
    fn test_empty_set_is_none() {
        let angular = HitJudge::Angular(AngularWindow::new());
        let temporal = HitJudge::Temporal(TemporalWindow::new());
        assert_eq!(angular.judge(&[], &press(), 4.0), Ruling::NONE);
        assert_eq!(temporal.judge(&[], &press(), 4.0), Ruling::NONE);
        assert_eq!(angular.release(&[], 4.0), Ruling::NONE);
    }

    #[test]
    fn test_angular_round_trip() {
        // 450 deg at 90 deg/s reaches the target at t = 4.0
        let judge = HitJudge::Angular(AngularWindow::new());
        let at_target = ring_note(0, 450.0 - 90.0 * 4.0);
        let ruling = judge.judge(&[at_target.clone()], &press(), 4.0);
        assert_eq!(ruling.verdict, Verdict::Hit(HitTier::Perfect));
        assert_eq!(ruling.action, Some(NoteAction::Remove(at_target.id)));

        let late = ring_note(0, 450.0 - 90.0 * 7.0);
        assert_eq!(judge.judge(&[late], &press(), 7.0), Ruling::NONE);
    }

    #[test]
    fn test_angular_tie_break_picks_smallest_delta() {
        let judge = HitJudge::Angular(AngularWindow::new());
        let notes = vec![ring_note(0, 75.0), ring_note(1, 93.0), ring_note(2, 104.0)];
        let ruling = judge.judge(&notes, &press(), 4.0);
        assert_eq!(ruling.verdict, Verdict::Hit(HitTier::Perfect));
        assert_eq!(ruling.action.map(|a| a.id().index), Some(1));
    }

    #[test]
    fn test_unhittable_notes_are_ignored() {
        let judge = HitJudge::Angular(AngularWindow::new());
        let mut note = ring_note(0, 90.0);
        note.is_hittable = false;
        assert_eq!(judge.judge(&[note], &press(), 4.0), Ruling::NONE);
    }

    #[test]
    fn test_slide_only_matches_drag_notes() {
        let judge = HitJudge::Angular(AngularWindow::new());
        let slide = JudgeInput::Slide {
            pos: Vec2::ZERO,
            speed: 1.0,
        };
        let tap = ring_note(0, 90.0);
        assert_eq!(judge.judge(&[tap], &slide, 4.0), Ruling::NONE);

        let mut drag = ring_note(0, 92.0);
        drag.descriptor = NoteDescriptor::drag(4.0, 0);
        assert_eq!(
            judge.judge(&[drag.clone()], &slide, 4.0).verdict,
            Verdict::Hit(HitTier::Perfect)
        );
        // Taps hit drag notes too.
        assert_eq!(
            judge.judge(&[drag], &press(), 4.0).verdict,
            Verdict::Hit(HitTier::Perfect)
        );
    }

    fn slash(pos: Vec2) -> JudgeInput {
        JudgeInput::Slide { pos, speed: 3.0 }
    }

    #[test]
    fn test_temporal_threshold() {
        let judge = HitJudge::Temporal(TemporalWindow::new());
        let note = flight_note(NoteDescriptor::tap(10.0, 0), Vec2::ZERO);

        let ruling = judge.judge(&[note.clone()], &slash(Vec2::ZERO), 10.15);
        assert_eq!(ruling.verdict, Verdict::Hit(HitTier::Good));
        assert_eq!(ruling.action, Some(NoteAction::Remove(note.id)));
        assert_eq!(judge.judge(&[note.clone()], &slash(Vec2::ZERO), 10.25), Ruling::NONE);
        assert_eq!(
            judge.judge(&[note], &slash(Vec2::ZERO), 10.05).verdict,
            Verdict::Hit(HitTier::Perfect)
        );
    }

    #[test]
    fn test_stationary_press_misses_flying_notes() {
        let judge = HitJudge::Temporal(TemporalWindow::new());
        assert!(!judge.hits_on_press());
        for descriptor in [
            NoteDescriptor::tap(10.0, 0),
            NoteDescriptor::drag(10.0, 0),
            NoteDescriptor::hold(10.0, 0, 1.0),
        ] {
            let note = flight_note(descriptor, Vec2::ZERO);
            assert_eq!(judge.judge(&[note], &press(), 10.0), Ruling::NONE);
        }

        let hold = flight_note(NoteDescriptor::hold(10.0, 0, 1.0), Vec2::ZERO);
        let ruling = judge.judge(&[hold.clone()], &slash(Vec2::ZERO), 10.0);
        assert_eq!(ruling.action, Some(NoteAction::BeginHold(hold.id)));
    }

    #[test]
    fn test_stationary_touch_never_slashes() {
        let judge = HitJudge::Temporal(TemporalWindow::new());
        let note = flight_note(NoteDescriptor::hyper(10.0, 0), Vec2::new(0.1, 0.0));
        assert_eq!(judge.judge(&[note.clone()], &press(), 10.0), Ruling::NONE);

        let slash = JudgeInput::Slide {
            pos: Vec2::ZERO,
            speed: 3.0,
        };
        assert_eq!(
            judge.judge(&[note.clone()], &slash, 10.0).verdict,
            Verdict::Hit(HitTier::Perfect)
        );

        let far = JudgeInput::Slide {
            pos: Vec2::new(1.0, 0.0),
            speed: 3.0,
        };
        assert_eq!(judge.judge(&[note], &far, 10.0), Ruling::NONE);
    }

    #[test]
    fn test_hold_press_begins_hold() {
        let judge = HitJudge::Angular(AngularWindow::new());
        let mut note = ring_note(0, 90.0);
        note.descriptor = NoteDescriptor::hold(4.0, 0, 1.0);
        let ruling = judge.judge(&[note.clone()], &press(), 4.0);
        assert_eq!(ruling.action, Some(NoteAction::BeginHold(note.id)));
    }

    #[test]
    fn test_angular_hold_release() {
        let judge = HitJudge::Angular(AngularWindow::new());
        let mut note = ring_note(0, 0.0);
        note.descriptor = NoteDescriptor::hold(4.0, 0, 1.0);
        note.held = true;

        note.tail = Some(95.0);
        assert_eq!(
            judge.release(&[note.clone()], 4.9).verdict,
            Verdict::Hit(HitTier::Perfect)
        );
        note.tail = Some(125.0);
        assert_eq!(judge.release(&[note.clone()], 4.6).verdict, Verdict::Miss);
        note.tail = Some(55.0);
        let ruling = judge.release(&[note.clone()], 5.4);
        assert_eq!(ruling.verdict, Verdict::Hit(HitTier::Late));
        assert_eq!(ruling.action, Some(NoteAction::ReleaseHold(note.id)));
    }

    #[test]
    fn test_temporal_force_resolve() {
        let judge = HitJudge::Temporal(TemporalWindow::new());
        let note = flight_note(NoteDescriptor::hold(10.0, 0, 2.0), Vec2::ZERO);
        assert_eq!(judge.force_resolve(&note, 10.5).verdict, Verdict::Miss);
        assert_eq!(
            judge.force_resolve(&note, 11.95).verdict,
            Verdict::Hit(HitTier::Perfect)
        );
        assert_eq!(
            judge.force_resolve(&note, 12.5).verdict,
            Verdict::Hit(HitTier::Late)
        );
    }
}
