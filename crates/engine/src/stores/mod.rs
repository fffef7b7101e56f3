//! In-memory state storage modules.
//!
//! Stores hold runtime state that doesn't belong in the database:
//! - `ReadingSessionStore` - readers' live traversal sessions

pub mod reading_sessions;

pub use reading_sessions::{ActiveReading, ReadingSessionStore};
