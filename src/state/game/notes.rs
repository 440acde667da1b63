//! Note processing - advance_notes, apply_ruling, apply_judgement

use super::GameEngine;
use crate::logic::judge::{NoteAction, Ruling};
use crate::logic::scheduler::{AdvanceReport, SpawnPolicy};
use crate::models::engine::{NoteId, Track};
use crate::models::stats::{HitTier, Judgement};
use crate::shared::snapshot::{JudgeResult, SpawnRequest, TickReport};
use crate::state::GameMode;

impl GameEngine {
    /// Advances both schedulers according to the current mode.
    pub(crate) fn advance_notes(&mut self, report: &mut TickReport) {
        let main_policy = if self.mode.plays_main() {
            SpawnPolicy::Spawn
        } else {
            SpawnPolicy::Skip
        };
        let main = self.main.advance(self.clock, main_policy);
        self.collect(Track::Main, main, report);

        if self.mode == GameMode::HyperStream {
            let hyper = self.hyper.advance(self.clock, SpawnPolicy::Spawn);
            self.collect(Track::Hyper, hyper, report);
        }

        if self.mode == GameMode::ThemeWait {
            for note in self.main.prune_faded() {
                report.release_requests.push(note.id);
            }
        }
    }

    fn collect(&mut self, track: Track, advanced: AdvanceReport, report: &mut TickReport) {
        let scheduler = match track {
            Track::Main => &self.main,
            Track::Hyper => &self.hyper,
        };
        for id in advanced.spawned {
            if let Some(note) = scheduler.active().iter().find(|n| n.id == id) {
                report.spawn_requests.push(SpawnRequest {
                    id,
                    descriptor: note.descriptor,
                });
            }
        }
        if advanced.skipped > 0 {
            log::debug!("ENGINE: skipped {} {:?} notes in {:?}", advanced.skipped, track, self.mode);
        }

        for note in advanced.missed {
            report.release_requests.push(note.id);
            self.apply_judgement(Some(note.id), Judgement::Miss, report);
        }
        for note in advanced.completed {
            report.release_requests.push(note.id);
            self.apply_judgement(Some(note.id), Judgement::Perfect, report);
        }
        for note in advanced.faded {
            report.release_requests.push(note.id);
        }
    }

    /// Carries out a judge ruling on `track`.
    pub(crate) fn apply_ruling(&mut self, track: Track, ruling: Ruling, report: &mut TickReport) {
        let Some(action) = ruling.action else {
            return;
        };
        let scheduler = match track {
            Track::Main => &mut self.main,
            Track::Hyper => &mut self.hyper,
        };

        match action {
            NoteAction::BeginHold(id) => {
                // Holds are judged on release or completion
                scheduler.set_held(id, true);
                log::trace!("ENGINE: hold started {:?}", id);
            }
            NoteAction::Remove(id) | NoteAction::ReleaseHold(id) => {
                if scheduler.remove(id).is_some() {
                    report.release_requests.push(id);
                }
                if let Some(judgement) = ruling.verdict.judgement() {
                    self.apply_judgement(Some(id), judgement, report);
                }
            }
        }
    }

    /// Resolves the held note of `track`, if any, through the release rules.
    pub(crate) fn resolve_held(&mut self, track: Track, report: &mut TickReport) {
        let (scheduler, judge) = match track {
            Track::Main => (&self.main, self.main_judge),
            Track::Hyper => (&self.hyper, self.hyper_judge),
        };
        if let Some(held) = scheduler.held_note() {
            let ruling = judge.force_resolve(held, self.clock);
            self.apply_ruling(track, ruling, report);
        }
    }

    /// Drops every active note of `track` without judging it.
    pub(crate) fn clear_track(&mut self, track: Track, report: &mut TickReport) {
        let cleared = match track {
            Track::Main => self.main.clear(),
            Track::Hyper => self.hyper.unload(),
        };
        report.release_requests.extend(cleared.iter().map(|n| n.id));
    }

    /// Applies a judgement to the game state (score, combo, stats, fire).
    pub(crate) fn apply_judgement(
        &mut self,
        id: Option<NoteId>,
        j: Judgement,
        report: &mut TickReport,
    ) {
        match j {
            Judgement::Miss => {
                self.combo = 0;
                self.groggy_streak = 0;
                self.fire.record_miss();
            }
            Judgement::GhostTap => {}
            Judgement::Perfect | Judgement::Good | Judgement::Late => {
                self.combo += 1;
                self.max_combo = self.max_combo.max(self.combo);
                self.groggy_streak += 1;
                self.score += j.score();
                let tier = match j {
                    Judgement::Perfect => HitTier::Perfect,
                    Judgement::Good => HitTier::Good,
                    _ => HitTier::Late,
                };
                self.fire.record_hit(tier);
            }
        }

        self.hit_stats.record(j);
        self.last_judgement = Some(j);
        log::debug!("ENGINE: {:?} {:?} at {:.3}s", j, id, self.clock);
        report.judge_results.push(JudgeResult {
            id,
            judgement: j,
            clock: self.clock,
        });
    }
}
