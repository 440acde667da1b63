//! Note descriptors and their live, scheduler-owned counterparts.

use crate::models::engine::pattern::{Pattern, PatternValidationError};
use glam::Vec2;
use rosu_map::section::hit_objects::{HitObject, HitObjectKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Width of the osu! playfield used to map hit object x positions onto lanes.
const OSU_PLAYFIELD_WIDTH: f32 = 512.0;

/// Type of note in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    /// Simple tap note.
    Tap,
    /// Long note: press on the head, release on the tail.
    Hold,
    /// Hit by sliding a finger through it (a tap also counts).
    Drag,
    /// Dense-stream note used by hyper phases, hit by slashing.
    Hyper,
}

/// A single authored or generated note. Immutable once part of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteDescriptor {
    /// When the note should be hit (seconds from pattern start).
    pub time: f64,
    pub kind: NoteKind,
    /// Ring track (ring mode) or flight lane (flight mode).
    pub lane: u8,
    /// Hold length in seconds, 0 for everything else.
    #[serde(default)]
    pub duration: f64,
}

impl NoteDescriptor {
    pub fn tap(time: f64, lane: u8) -> Self {
        Self {
            time,
            kind: NoteKind::Tap,
            lane,
            duration: 0.0,
        }
    }

    pub fn hold(time: f64, lane: u8, duration: f64) -> Self {
        Self {
            time,
            kind: NoteKind::Hold,
            lane,
            duration,
        }
    }

    pub fn drag(time: f64, lane: u8) -> Self {
        Self {
            time,
            kind: NoteKind::Drag,
            lane,
            duration: 0.0,
        }
    }

    pub fn hyper(time: f64, lane: u8) -> Self {
        Self {
            time,
            kind: NoteKind::Hyper,
            lane,
            duration: 0.0,
        }
    }

    /// Returns the end time of this note (`time + duration` for holds).
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }

    pub fn is_hold(&self) -> bool {
        self.kind == NoteKind::Hold
    }
}

/// Which scheduler a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// The main pattern.
    Main,
    /// The stream played during a hyper phase.
    Hyper,
}

/// Stable identity of a spawned note: its track and pattern index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId {
    pub track: Track,
    pub index: usize,
}

/// Time-derived visual parameter of an active note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Ring angle in degrees.
    Angle(f64),
    /// Flight position in playfield units.
    Position(Vec2),
}

impl Placement {
    pub fn angle(&self) -> Option<f64> {
        match self {
            Placement::Angle(a) => Some(*a),
            Placement::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        match self {
            Placement::Position(p) => Some(*p),
            Placement::Angle(_) => None,
        }
    }
}

/// A note currently on screen, owned by a scheduler's active set.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNote {
    pub id: NoteId,
    pub descriptor: NoteDescriptor,
    /// Absolute audio time at which the head should be hit.
    pub target_time: f64,
    /// Nominal spawn instant (`target_time - lookahead`).
    pub spawn_audio_time: f64,
    pub placement: Placement,
    /// Tail angle of ring holds.
    pub tail: Option<f64>,
    pub is_hittable: bool,
    pub held: bool,
    /// 1.0 while visible, decays to 0.0 once the note is fading out.
    pub opacity: f32,
    /// Clock at which a fade-out started, if any.
    pub fade_started: Option<f64>,
}

impl ActiveNote {
    /// Absolute audio time at which the hold tail should be released.
    pub fn tail_time(&self) -> f64 {
        self.target_time + self.descriptor.duration
    }

    pub fn is_fading(&self) -> bool {
        self.fade_started.is_some()
    }
}

/// Loads an osu! beatmap as a flight pattern.
/// Returns the audio path next to the map and the validated pattern.
pub fn import_osu(path: &Path, lane_count: u8) -> Result<(PathBuf, Pattern), String> {
    let map = rosu_map::Beatmap::from_path(path)
        .map_err(|e| format!("Failed to load beatmap {:?}: {}", path, e))?;

    let audio_path = path
        .parent()
        .ok_or_else(|| format!("Invalid path (no parent): {:?}", path))?
        .join(&map.audio_file);

    let mut notes: Vec<NoteDescriptor> = map
        .hit_objects
        .iter()
        .filter_map(|hit_object| parse_hit_object(hit_object, lane_count))
        .collect();
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let pattern = Pattern::load(notes, lane_count)
        .map_err(|e: PatternValidationError| format!("Invalid beatmap {:?}: {}", path, e))?;

    log::info!(
        "PATTERN: Imported {} notes from {:?}",
        pattern.len(),
        path.file_name().unwrap_or_default()
    );
    Ok((audio_path, pattern))
}

/// Converts an osu! hit object into a note descriptor.
/// Sliders and spinners are ignored.
pub fn parse_hit_object(hit_object: &HitObject, lane_count: u8) -> Option<NoteDescriptor> {
    let time = hit_object.start_time / 1000.0;
    match &hit_object.kind {
        HitObjectKind::Circle(circle) => {
            let lane = x_to_lane(circle.pos.x, lane_count)?;
            Some(NoteDescriptor::tap(time, lane))
        }
        HitObjectKind::Hold(hold) => {
            let lane = x_to_lane(hold.pos_x, lane_count)?;
            Some(NoteDescriptor::hold(time, lane, hold.duration / 1000.0))
        }
        _ => None,
    }
}

/// Maps an osu! x coordinate onto one of `lane_count` equal-width lanes.
pub fn x_to_lane(x: f32, lane_count: u8) -> Option<u8> {
    if lane_count == 0 || !x.is_finite() || x < 0.0 {
        return None;
    }
    let lane_width = OSU_PLAYFIELD_WIDTH / lane_count as f32;
    let lane = (x / lane_width).floor() as u32;
    if lane < lane_count as u32 {
        Some(lane as u8)
    } else {
        log::warn!("PATTERN: Hit object x={x} outside the playfield");
        None
    }
}
