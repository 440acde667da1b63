//! Input types shared between the host and the engine.

pub mod events;

pub use events::GestureEvent;
