//! Validated, immutable note patterns.
//!
//! A `Pattern` is the single source of truth consumed by the scheduler. It is
//! checked once at load time (sort order, durations, lanes) and never mutated
//! or re-sorted afterwards.

use crate::models::engine::note::NoteDescriptor;
use std::ops::Index;
use thiserror::Error;

/// Reasons a pattern is rejected at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternValidationError {
    #[error("note {index} has a non-finite time")]
    NonFiniteTime { index: usize },
    #[error("note {index} at {time}s comes before the previous note at {previous}s")]
    Unsorted {
        index: usize,
        time: f64,
        previous: f64,
    },
    #[error("note {index} has an invalid duration {duration}")]
    InvalidDuration { index: usize, duration: f64 },
    #[error("note {index} uses lane {lane} but the pattern only has {lane_count} lanes")]
    LaneOutOfRange {
        index: usize,
        lane: u8,
        lane_count: u8,
    },
}

/// Ordered sequence of notes, sorted ascending by time.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    notes: Vec<NoteDescriptor>,
    lane_count: u8,
}

impl Pattern {
    /// Validates `notes` and wraps them into a pattern.
    ///
    /// Fails on the first offending note; nothing is partially loaded.
    pub fn load(
        notes: Vec<NoteDescriptor>,
        lane_count: u8,
    ) -> Result<Self, PatternValidationError> {
        let mut previous = f64::NEG_INFINITY;
        for (index, note) in notes.iter().enumerate() {
            if !note.time.is_finite() {
                return Err(PatternValidationError::NonFiniteTime { index });
            }
            if note.time < previous {
                return Err(PatternValidationError::Unsorted {
                    index,
                    time: note.time,
                    previous,
                });
            }
            if !note.duration.is_finite() || note.duration < 0.0 {
                return Err(PatternValidationError::InvalidDuration {
                    index,
                    duration: note.duration,
                });
            }
            if note.lane >= lane_count {
                return Err(PatternValidationError::LaneOutOfRange {
                    index,
                    lane: note.lane,
                    lane_count,
                });
            }
            previous = note.time;
        }

        Ok(Self { notes, lane_count })
    }

    /// An empty pattern.
    pub fn empty(lane_count: u8) -> Self {
        Self {
            notes: Vec::new(),
            lane_count,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NoteDescriptor> {
        self.notes.get(index)
    }

    pub fn notes(&self) -> &[NoteDescriptor] {
        &self.notes
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteDescriptor> {
        self.notes.iter()
    }

    pub fn lane_count(&self) -> u8 {
        self.lane_count
    }

    /// Time of the last note end (0 for an empty pattern).
    pub fn duration(&self) -> f64 {
        self.notes
            .iter()
            .map(NoteDescriptor::end_time)
            .fold(0.0, f64::max)
    }

    /// md5 hex digest of the pattern, used to name stored patterns.
    pub fn fingerprint(&self) -> String {
        let mut bytes = Vec::with_capacity(self.notes.len() * 24 + 1);
        bytes.push(self.lane_count);
        for note in &self.notes {
            bytes.extend_from_slice(&note.time.to_le_bytes());
            bytes.push(note.kind as u8);
            bytes.push(note.lane);
            bytes.extend_from_slice(&note.duration.to_le_bytes());
        }
        format!("{:x}", md5::compute(&bytes))
    }
}

impl Index<usize> for Pattern {
    type Output = NoteDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.notes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_accepts_sorted_with_ties() {
        let notes = vec![
            NoteDescriptor::tap(1.0, 0),
            NoteDescriptor::tap(1.0, 1),
            NoteDescriptor::hold(2.0, 2, 0.5),
        ];
        let pattern = Pattern::load(notes, 4).unwrap();
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern[2].lane, 2);
        assert_eq!(pattern.duration(), 2.5);
    }

    #[test]
    fn test_load_rejects_unsorted() {
        let notes = vec![NoteDescriptor::tap(2.0, 0), NoteDescriptor::tap(1.0, 0)];
        assert_eq!(
            Pattern::load(notes, 4),
            Err(PatternValidationError::Unsorted {
                index: 1,
                time: 1.0,
                previous: 2.0
            })
        );
    }

    #[test]
    fn test_load_rejects_negative_duration() {
        let notes = vec![NoteDescriptor::hold(1.0, 0, -0.5)];
        assert!(matches!(
            Pattern::load(notes, 4),
            Err(PatternValidationError::InvalidDuration { index: 0, .. })
        ));
    }

    #[test]
    fn test_load_rejects_lane_out_of_range() {
        let notes = vec![NoteDescriptor::tap(0.5, 0), NoteDescriptor::tap(1.0, 4)];
        assert_eq!(
            Pattern::load(notes, 4),
            Err(PatternValidationError::LaneOutOfRange {
                index: 1,
                lane: 4,
                lane_count: 4
            })
        );
    }

    #[test]
    fn test_load_rejects_nan_time() {
        let notes = vec![NoteDescriptor::tap(f64::NAN, 0)];
        assert_eq!(
            Pattern::load(notes, 4),
            Err(PatternValidationError::NonFiniteTime { index: 0 })
        );
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = Pattern::load(vec![NoteDescriptor::tap(1.0, 0)], 4).unwrap();
        let b = Pattern::load(vec![NoteDescriptor::tap(1.0, 0)], 4).unwrap();
        let c = Pattern::load(vec![NoteDescriptor::tap(1.0, 1)], 4).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 32);
    }
}
