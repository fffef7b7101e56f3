//! Graph editor - authoring operations on a story's scene graph.
//!
//! Every operation takes the current graph by reference and returns a new graph.
//! On error the caller's graph is untouched, so discarding a failed edit is free.
//!
//! Referential integrity is enforced when a choice is written: a choice can only
//! point at a scene that exists at that moment. Nothing prunes scenes that become
//! unreachable; orphans are allowed.

mod session;

pub use session::EditorSession;

use serde::{Deserialize, Serialize};

use crate::entities::{Choice, Scene, StoryGraph};
use crate::error::DomainError;
use crate::ids::SceneId;

/// Add a new scene with no choices.
///
/// The scene is not linked from anywhere; the author adds a choice pointing to it.
///
/// # Errors
///
/// - `DomainError::Validation` if `id` or `text` is blank
/// - `DomainError::DuplicateId` if a scene with `id` already exists
pub fn create_scene(
    graph: &StoryGraph,
    id: impl Into<SceneId>,
    text: impl Into<String>,
) -> Result<StoryGraph, DomainError> {
    let id = id.into();
    let text = text.into();

    if id.as_str().trim().is_empty() {
        return Err(DomainError::validation("Scene id cannot be empty"));
    }
    if text.trim().is_empty() {
        return Err(DomainError::validation("Scene text cannot be empty"));
    }
    if graph.contains(id.as_str()) {
        return Err(DomainError::duplicate_id(id));
    }

    let mut next = graph.clone();
    next.push_scene(Scene::new(id, text));
    Ok(next)
}

/// Replace a scene's text. Choices are left alone.
pub fn update_scene_text(
    graph: &StoryGraph,
    scene_id: &str,
    text: impl Into<String>,
) -> Result<StoryGraph, DomainError> {
    let mut next = graph.clone();
    scene_mut(&mut next, scene_id)?.set_text(text.into());
    Ok(next)
}

/// Append a choice to a scene's choice list.
///
/// # Errors
///
/// - `DomainError::NotFound` if the owning scene does not exist
/// - `DomainError::Validation` if the choice text is blank or its target
///   does not resolve in `graph`
pub fn add_choice(
    graph: &StoryGraph,
    scene_id: &str,
    choice: Choice,
) -> Result<StoryGraph, DomainError> {
    select_scene(graph, scene_id)?;
    validate_choice(graph, &choice)?;

    let mut next = graph.clone();
    scene_mut(&mut next, scene_id)?.push_choice(choice);
    Ok(next)
}

/// Replace the choice at `index`, keeping its position.
pub fn update_choice(
    graph: &StoryGraph,
    scene_id: &str,
    index: usize,
    choice: Choice,
) -> Result<StoryGraph, DomainError> {
    let scene = select_scene(graph, scene_id)?;
    check_index(scene, index)?;
    validate_choice(graph, &choice)?;

    let mut next = graph.clone();
    scene_mut(&mut next, scene_id)?.replace_choice(index, choice);
    Ok(next)
}

/// Remove the choice at `index`. The scene it pointed to stays in the graph
/// even when nothing else leads there any more.
pub fn delete_choice(
    graph: &StoryGraph,
    scene_id: &str,
    index: usize,
) -> Result<StoryGraph, DomainError> {
    check_index(select_scene(graph, scene_id)?, index)?;

    let mut next = graph.clone();
    scene_mut(&mut next, scene_id)?.remove_choice(index);
    Ok(next)
}

/// Look up a scene for display in the editor.
pub fn select_scene<'a>(graph: &'a StoryGraph, scene_id: &str) -> Result<&'a Scene, DomainError> {
    graph
        .find_scene(scene_id)
        .ok_or_else(|| DomainError::not_found("Scene", scene_id))
}

fn scene_mut<'a>(graph: &'a mut StoryGraph, scene_id: &str) -> Result<&'a mut Scene, DomainError> {
    graph
        .find_scene_mut(scene_id)
        .ok_or_else(|| DomainError::not_found("Scene", scene_id))
}

fn check_index(scene: &Scene, index: usize) -> Result<(), DomainError> {
    if index >= scene.choices().len() {
        return Err(DomainError::index_out_of_range(
            scene.id().as_str(),
            index,
            scene.choices().len(),
        ));
    }
    Ok(())
}

fn validate_choice(graph: &StoryGraph, choice: &Choice) -> Result<(), DomainError> {
    if choice.text().trim().is_empty() {
        return Err(DomainError::validation("Choice text cannot be empty"));
    }
    if !graph.contains(choice.target_scene_id().as_str()) {
        return Err(DomainError::validation(format!(
            "Choice target '{}' does not exist",
            choice.target_scene_id()
        )));
    }
    Ok(())
}

// =============================================================================
// Edit commands
// =============================================================================

/// One editor operation, as sent by a client that batches its edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphEdit {
    CreateScene {
        id: SceneId,
        text: String,
    },
    UpdateSceneText {
        scene_id: SceneId,
        text: String,
    },
    AddChoice {
        scene_id: SceneId,
        choice: Choice,
    },
    UpdateChoice {
        scene_id: SceneId,
        index: usize,
        choice: Choice,
    },
    DeleteChoice {
        scene_id: SceneId,
        index: usize,
    },
}

impl GraphEdit {
    /// Apply this edit to `graph`, returning the edited copy.
    pub fn apply(&self, graph: &StoryGraph) -> Result<StoryGraph, DomainError> {
        match self {
            Self::CreateScene { id, text } => create_scene(graph, id.clone(), text.as_str()),
            Self::UpdateSceneText { scene_id, text } => {
                update_scene_text(graph, scene_id.as_str(), text.as_str())
            }
            Self::AddChoice { scene_id, choice } => {
                add_choice(graph, scene_id.as_str(), choice.clone())
            }
            Self::UpdateChoice {
                scene_id,
                index,
                choice,
            } => update_choice(graph, scene_id.as_str(), *index, choice.clone()),
            Self::DeleteChoice { scene_id, index } => {
                delete_choice(graph, scene_id.as_str(), *index)
            }
        }
    }
}

/// Apply a batch of edits in order, all or nothing.
///
/// Later edits see the results of earlier ones, so a batch can create a scene
/// and link to it. The first failing edit aborts the batch and its error is
/// returned; `graph` is never modified.
///
/// # Example
///
/// ```
/// use branchtale_domain::editor::{apply_edits, GraphEdit};
/// use branchtale_domain::{Choice, StoryGraph};
///
/// let graph = StoryGraph::new();
/// let edits = vec![
///     GraphEdit::CreateScene { id: "cave".into(), text: "It is dark.".into() },
///     GraphEdit::AddChoice { scene_id: "start".into(), choice: Choice::new("Enter", "cave") },
/// ];
///
/// let edited = apply_edits(&graph, &edits).unwrap();
/// assert_eq!(edited.len(), 2);
/// assert_eq!(graph.len(), 1);
/// ```
pub fn apply_edits(graph: &StoryGraph, edits: &[GraphEdit]) -> Result<StoryGraph, DomainError> {
    edits
        .iter()
        .try_fold(graph.clone(), |current, edit| edit.apply(&current))
}
