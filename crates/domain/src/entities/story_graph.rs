//! StoryGraph - the whole scene collection of one story.
//!
//! The graph is persisted and loaded as a single value (a JSON array of scenes);
//! there is no per-scene addressing outside of this type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::scene::{Choice, Scene, PREVIEW_CHARS};
use crate::error::DomainError;
use crate::ids::{SceneId, ENTRY_SCENE_ID};

/// Placeholder text of the entry scene in a freshly created story.
pub const DEFAULT_ENTRY_TEXT: &str = "Your story begins here...";

/// Label shown for a choice whose target cannot be resolved.
const UNKNOWN_SCENE_LABEL: &str = "Unknown scene";

/// The directed graph of scenes making up a story.
///
/// Order within the collection carries no meaning beyond display order in the
/// editor. Cycles, self-loops and orphaned scenes are all valid.
///
/// Graphs loaded from storage are taken as-is: a corrupted record may lack the
/// entry scene or contain dangling choices, and the reader defends against that
/// instead of this type rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryGraph {
    scenes: Vec<Scene>,
}

impl Default for StoryGraph {
    fn default() -> Self {
        Self {
            scenes: vec![Scene::new(SceneId::entry(), DEFAULT_ENTRY_TEXT)],
        }
    }
}

impl StoryGraph {
    /// A new graph holding only the placeholder entry scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing scene collection (used when loading from storage).
    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Exact id lookup.
    pub fn find_scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_scene(id).is_some()
    }

    /// The `"start"` scene.
    ///
    /// # Errors
    ///
    /// `DomainError::MissingEntryPoint` when the graph has no scene with id `"start"`.
    pub fn entry_scene(&self) -> Result<&Scene, DomainError> {
        self.find_scene(ENTRY_SCENE_ID)
            .ok_or(DomainError::MissingEntryPoint)
    }

    /// Display label for where a choice leads.
    pub fn target_label(&self, choice: &Choice) -> String {
        self.find_scene(choice.target_scene_id().as_str())
            .map(|scene| scene.preview(PREVIEW_CHARS))
            .unwrap_or_else(|| UNKNOWN_SCENE_LABEL.to_string())
    }

    /// Structural check for whole graphs arriving from outside the editor.
    ///
    /// Verifies there is exactly one `"start"` scene, that scene ids are unique,
    /// and that every choice target resolves. Reachability is not checked:
    /// orphaned scenes and dead ends are the author's business.
    pub fn check_structure(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(self.scenes.len());
        for scene in &self.scenes {
            if !seen.insert(scene.id().as_str()) {
                return Err(DomainError::duplicate_id(scene.id().as_str()));
            }
        }

        if !seen.contains(ENTRY_SCENE_ID) {
            return Err(DomainError::MissingEntryPoint);
        }

        for scene in &self.scenes {
            for choice in scene.choices() {
                if !seen.contains(choice.target_scene_id().as_str()) {
                    return Err(DomainError::broken_link(
                        scene.id().as_str(),
                        choice.target_scene_id().as_str(),
                    ));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Mutation (editor only)
    // =========================================================================

    pub(crate) fn find_scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.id() == id)
    }

    pub(crate) fn push_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }
}
