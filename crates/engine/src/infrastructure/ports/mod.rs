//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Story persistence (SQLite today, any relational store tomorrow)
//! - Image hosting behind the upload relay
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{ImageHostError, RepoError};
pub use external::{ImageHostPort, ImageUpload};
pub use repos::{StoryOrder, StoryRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockImageHostPort;
#[cfg(test)]
pub use repos::MockStoryRepo;
#[cfg(test)]
pub use testing::MockClockPort;
