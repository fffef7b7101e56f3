//! Authoring session state: the draft graph plus the scene being edited.

use crate::entities::{Choice, Scene, StoryGraph};
use crate::error::DomainError;
use crate::ids::SceneId;

use super::GraphEdit;

/// An author's in-progress edit of one story graph.
///
/// Keeps the last saved graph next to the draft so that abandoning changes is a
/// plain [`discard`](Self::discard). Failed operations leave both the draft and
/// the selection as they were.
#[derive(Debug, Clone)]
pub struct EditorSession {
    saved: StoryGraph,
    draft: StoryGraph,
    selected: SceneId,
}

impl EditorSession {
    /// Start editing `graph` with the entry scene selected.
    pub fn new(graph: StoryGraph) -> Self {
        Self {
            saved: graph.clone(),
            draft: graph,
            selected: SceneId::entry(),
        }
    }

    pub fn draft(&self) -> &StoryGraph {
        &self.draft
    }

    pub fn selected_id(&self) -> &SceneId {
        &self.selected
    }

    /// The scene currently open in the editor.
    pub fn selected_scene(&self) -> Result<&Scene, DomainError> {
        super::select_scene(&self.draft, self.selected.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.saved != self.draft
    }

    pub fn select(&mut self, scene_id: &str) -> Result<&Scene, DomainError> {
        super::select_scene(&self.draft, scene_id)?;
        self.selected = SceneId::new(scene_id);
        self.selected_scene()
    }

    /// Create a scene and open it, like the editor's "Add New Scene" dialog.
    pub fn create_scene(
        &mut self,
        id: impl Into<SceneId>,
        text: impl Into<String>,
    ) -> Result<&Scene, DomainError> {
        let id = id.into();
        self.draft = super::create_scene(&self.draft, id.clone(), text)?;
        self.selected = id;
        self.selected_scene()
    }

    pub fn update_selected_text(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.draft = super::update_scene_text(&self.draft, self.selected.as_str(), text)?;
        Ok(())
    }

    pub fn add_choice(&mut self, choice: Choice) -> Result<(), DomainError> {
        self.draft = super::add_choice(&self.draft, self.selected.as_str(), choice)?;
        Ok(())
    }

    pub fn update_choice(&mut self, index: usize, choice: Choice) -> Result<(), DomainError> {
        self.draft = super::update_choice(&self.draft, self.selected.as_str(), index, choice)?;
        Ok(())
    }

    pub fn delete_choice(&mut self, index: usize) -> Result<(), DomainError> {
        self.draft = super::delete_choice(&self.draft, self.selected.as_str(), index)?;
        Ok(())
    }

    /// Apply a client-side edit command to the draft.
    pub fn apply(&mut self, edit: &GraphEdit) -> Result<(), DomainError> {
        self.draft = edit.apply(&self.draft)?;
        Ok(())
    }

    /// Throw away every change since the last save.
    pub fn discard(&mut self) {
        self.draft = self.saved.clone();
        if !self.draft.contains(self.selected.as_str()) {
            self.selected = SceneId::entry();
        }
    }

    /// Record that the draft was persisted, returning the graph to write.
    pub fn mark_saved(&mut self) -> &StoryGraph {
        self.saved = self.draft.clone();
        &self.saved
    }

    pub fn into_draft(self) -> StoryGraph {
        self.draft
    }
}
