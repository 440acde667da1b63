pub mod constants;
pub mod hit_window;
pub mod note;
pub mod pattern;
pub mod playfield;

pub use constants::*;
pub use hit_window::{AngularWindow, ReleaseOutcome, TemporalWindow, delta_angle};
pub use note::{
    ActiveNote, NoteDescriptor, NoteId, NoteKind, Placement, Track, import_osu, parse_hit_object,
    x_to_lane,
};
pub use pattern::{Pattern, PatternValidationError};
pub use playfield::{FlightConfig, RingConfig};
