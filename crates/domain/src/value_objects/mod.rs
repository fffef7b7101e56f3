//! Value objects - immutable, validated-by-construction domain values.

mod names;

pub use names::{StoryDescription, StoryTitle};
