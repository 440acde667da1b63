//! Runtime logic: note scheduling, judging, fire fuel and the host loop.

pub mod autoplay;
pub mod capabilities;
pub mod fire;
pub mod game_loop;
pub mod gesture;
pub mod judge;
pub mod scheduler;

pub use game_loop::GameLoop;
