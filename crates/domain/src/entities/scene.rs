//! Scene and Choice - the nodes and edges of a story graph.

use serde::{Deserialize, Serialize};

use crate::ids::SceneId;

/// Number of characters shown when a scene is previewed as a choice target.
pub const PREVIEW_CHARS: usize = 30;

/// A labeled, directed edge from one scene to another.
///
/// Self-loops and several choices leading to the same scene are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    text: String,
    #[serde(rename = "targetSceneId")]
    target_scene_id: SceneId,
}

impl Choice {
    /// Build a choice. Nothing is validated here; the editor checks the label and
    /// the target against the graph the choice is added to.
    pub fn new(text: impl Into<String>, target_scene_id: impl Into<SceneId>) -> Self {
        Self {
            text: text.into(),
            target_scene_id: target_scene_id.into(),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn target_scene_id(&self) -> &SceneId {
        &self.target_scene_id
    }
}

/// A node of narrative text plus its outgoing choices, in display order.
///
/// # Invariants
///
/// - A scene without choices is an ending ([`Scene::is_terminal`]).
/// - The scene with id `"start"` is the story's entry point ([`Scene::is_entry`]).
///
/// # Example
///
/// ```
/// use branchtale_domain::{Choice, Scene};
///
/// let scene = Scene::new("start", "You wake up in a cave.")
///     .with_choice(Choice::new("Walk towards the light", "exit"));
///
/// assert!(scene.is_entry());
/// assert!(!scene.is_terminal());
/// assert_eq!(scene.choices()[0].target_scene_id(), "exit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    id: SceneId,
    text: String,
    #[serde(default)]
    choices: Vec<Choice>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &SceneId {
        &self.id
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// True iff the scene has no outgoing choices.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// True iff this is the `"start"` scene.
    pub fn is_entry(&self) -> bool {
        self.id.is_entry()
    }

    /// Short label for the scene: its first `max_chars` characters, with `...`
    /// appended when the text was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    // =========================================================================
    // Builder Methods (for construction and loading)
    // =========================================================================

    /// Append a choice without validating its target.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    // =========================================================================
    // Mutation (editor only)
    // =========================================================================

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn push_choice(&mut self, choice: Choice) {
        self.choices.push(choice);
    }

    /// Caller has checked `index` is in bounds.
    pub(crate) fn replace_choice(&mut self, index: usize, choice: Choice) {
        self.choices[index] = choice;
    }

    /// Caller has checked `index` is in bounds.
    pub(crate) fn remove_choice(&mut self, index: usize) -> Choice {
        self.choices.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_is_terminal() {
        let scene = Scene::new("ending1", "The end.");
        assert!(scene.is_terminal());
        assert!(!scene.is_entry());
    }

    #[test]
    fn choices_keep_insertion_order() {
        let scene = Scene::new("start", "Crossroads")
            .with_choice(Choice::new("Left", "left"))
            .with_choice(Choice::new("Right", "right"));
        let labels: Vec<_> = scene.choices().iter().map(Choice::text).collect();
        assert_eq!(labels, vec!["Left", "Right"]);
    }

    #[test]
    fn wire_format_uses_target_scene_id() {
        let scene = Scene::new("start", "Hi").with_choice(Choice::new("Go", "a"));
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "start",
                "text": "Hi",
                "choices": [{ "text": "Go", "targetSceneId": "a" }]
            })
        );
    }

    #[test]
    fn missing_choices_field_deserializes_as_terminal() {
        let scene: Scene = serde_json::from_str(r#"{"id":"end","text":"Bye"}"#).unwrap();
        assert!(scene.is_terminal());
    }

    mod preview {
        use super::*;

        #[test]
        fn short_text_is_unchanged() {
            assert_eq!(Scene::new("a", "Short").preview(PREVIEW_CHARS), "Short");
        }

        #[test]
        fn long_text_is_cut_with_ellipsis() {
            let scene = Scene::new("a", "abcdefghijklmnopqrstuvwxyz0123456789");
            assert_eq!(scene.preview(PREVIEW_CHARS), "abcdefghijklmnopqrstuvwxyz0123...");
        }

        #[test]
        fn counts_characters_not_bytes() {
            let scene = Scene::new("a", "ééééé");
            assert_eq!(scene.preview(3), "ééé...");
        }
    }
}
