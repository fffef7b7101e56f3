//! Aggregate mutation outcomes.
//!
//! Mutations on the `Story` aggregate return these enums so callers can log or
//! broadcast exactly what changed.

pub mod story_events;

pub use story_events::*;
