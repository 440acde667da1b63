//! Data shared between the engine and its host.

pub mod snapshot;
