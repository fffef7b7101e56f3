//! Entities - the scene graph a story is made of.

pub mod scene;
pub mod story_graph;

pub use scene::{Choice, Scene, PREVIEW_CHARS};
pub use story_graph::{StoryGraph, DEFAULT_ENTRY_TEXT};
