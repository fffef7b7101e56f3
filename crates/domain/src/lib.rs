//! Branchtale domain: branching stories as scene graphs.
//!
//! - [`entities`] - `Scene`, `Choice` and the `StoryGraph` they form
//! - [`editor`] - authoring operations that keep a graph playable
//! - [`traversal`] - the reader's navigation state machine
//! - [`aggregates`] - the `Story` aggregate persisted as one unit
//!
//! Nothing here performs I/O. Callers pass the graph and the acting user in
//! explicitly.

pub mod aggregates;
pub mod editor;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod traversal;
pub mod value_objects;

pub use aggregates::Story;
pub use editor::{EditorSession, GraphEdit};
pub use entities::{Choice, Scene, StoryGraph, DEFAULT_ENTRY_TEXT, PREVIEW_CHARS};
pub use error::DomainError;
pub use events::StoryUpdate;
pub use ids::{SceneId, StoryId, UserId, ENTRY_SCENE_ID};
pub use traversal::ReadingSession;
pub use value_objects::{StoryDescription, StoryTitle};
