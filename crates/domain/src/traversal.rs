//! Reader traversal engine.
//!
//! A reading session has one state, `Reading(current_scene)`, and three inputs:
//! [`select_choice`](ReadingSession::select_choice), [`go_back`](ReadingSession::go_back)
//! and [`restart`](ReadingSession::restart). Endings are not a separate state;
//! [`is_at_ending`](ReadingSession::is_at_ending) derives it from the current scene.
//!
//! History is a stack of the scenes left behind by forward moves. It never holds
//! the current scene, and revisiting a scene through a cycle pushes it again.

use std::sync::Arc;

use crate::entities::{Choice, Scene, StoryGraph};
use crate::error::DomainError;

/// One reader's walk through a story graph.
///
/// The graph is shared read-only; reading never mutates a story.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use branchtale_domain::{Choice, ReadingSession, Scene, StoryGraph};
///
/// let graph = StoryGraph::from_scenes(vec![
///     Scene::new("start", "A fork in the road.").with_choice(Choice::new("Go left", "left")),
///     Scene::new("left", "You found the treasure."),
/// ]);
///
/// let mut session = ReadingSession::start(Arc::new(graph)).unwrap();
/// session.select_choice(0).unwrap();
///
/// assert!(session.is_at_ending());
/// assert_eq!(session.history().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ReadingSession {
    graph: Arc<StoryGraph>,
    current: Scene,
    history: Vec<Scene>,
}

impl ReadingSession {
    /// Open `graph` at its entry scene with empty history.
    ///
    /// # Errors
    ///
    /// `DomainError::MissingEntryPoint` if the graph has no `"start"` scene.
    pub fn start(graph: Arc<StoryGraph>) -> Result<Self, DomainError> {
        let current = graph.entry_scene()?.clone();
        Ok(Self {
            graph,
            current,
            history: Vec::new(),
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn current_scene(&self) -> &Scene {
        &self.current
    }

    /// Previously visited scenes, oldest first.
    pub fn history(&self) -> &[Scene] {
        &self.history
    }

    /// Number of scenes on the history stack.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_at_ending(&self) -> bool {
        self.current.is_terminal()
    }

    /// Choices the reader can pick from; empty at an ending.
    pub fn available_choices(&self) -> &[Choice] {
        self.current.choices()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Follow the choice at `index` from the current scene.
    ///
    /// The target is resolved before anything changes, so a failure leaves the
    /// session exactly as it was.
    ///
    /// # Errors
    ///
    /// - `DomainError::IndexOutOfRange` if `index` is not a choice of the
    ///   current scene (always the case at an ending)
    /// - `DomainError::BrokenLink` if the choice leads to a scene that is not in
    ///   the graph
    pub fn select_choice(&mut self, index: usize) -> Result<&Scene, DomainError> {
        let choice = self.current.choice(index).ok_or_else(|| {
            DomainError::index_out_of_range(
                self.current.id().as_str(),
                index,
                self.current.choices().len(),
            )
        })?;

        let target = self
            .graph
            .find_scene(choice.target_scene_id().as_str())
            .ok_or_else(|| {
                DomainError::broken_link(
                    self.current.id().as_str(),
                    choice.target_scene_id().as_str(),
                )
            })?
            .clone();

        let previous = std::mem::replace(&mut self.current, target);
        self.history.push(previous);
        Ok(&self.current)
    }

    /// Return to the previous scene. Does nothing when history is empty.
    ///
    /// Returns whether the session moved.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Jump back to the entry scene and forget the history.
    ///
    /// # Errors
    ///
    /// `DomainError::MissingEntryPoint` if the graph has no `"start"` scene;
    /// the session is left unchanged.
    pub fn restart(&mut self) -> Result<&Scene, DomainError> {
        let entry = self.graph.entry_scene()?.clone();
        self.current = entry;
        self.history.clear();
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SceneId;

    /// start -> "go to A" -> A, A -> "go back" -> start
    fn cycle_graph() -> Arc<StoryGraph> {
        Arc::new(StoryGraph::from_scenes(vec![
            Scene::new("start", "The start").with_choice(Choice::new("go to A", "A")),
            Scene::new("A", "Scene A").with_choice(Choice::new("go back", "start")),
        ]))
    }

    fn ids(scenes: &[Scene]) -> Vec<&str> {
        scenes.iter().map(|s| s.id().as_str()).collect()
    }

    mod start {
        use super::*;

        #[test]
        fn begins_at_entry_with_empty_history() {
            let session = ReadingSession::start(cycle_graph()).unwrap();
            assert_eq!(session.current_scene().id(), "start");
            assert!(session.history().is_empty());
            assert!(!session.can_go_back());
        }

        #[test]
        fn missing_entry_is_reported() {
            let graph = Arc::new(StoryGraph::from_scenes(vec![Scene::new("A", "No start")]));
            let err = ReadingSession::start(graph).unwrap_err();
            assert_eq!(err, DomainError::MissingEntryPoint);
        }

        #[test]
        fn empty_graph_is_missing_entry() {
            let err = ReadingSession::start(Arc::new(StoryGraph::from_scenes(vec![]))).unwrap_err();
            assert_eq!(err, DomainError::MissingEntryPoint);
        }
    }

    mod select_choice {
        use super::*;

        #[test]
        fn cycle_revisit_keeps_duplicates_in_history() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            session.select_choice(0).unwrap();
            session.select_choice(0).unwrap();

            assert_eq!(session.current_scene().id(), "start");
            assert_eq!(ids(session.history()), vec!["start", "A"]);

            session.select_choice(0).unwrap();
            assert_eq!(ids(session.history()), vec!["start", "A", "start"]);
        }

        #[test]
        fn history_never_contains_current_after_forward_move() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            session.select_choice(0).unwrap();
            assert_eq!(session.current_scene().id(), "A");
            assert!(session.history().iter().all(|s| s.id() != "A"));
        }

        #[test]
        fn out_of_range_index_leaves_state() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            let err = session.select_choice(5).unwrap_err();
            assert_eq!(err, DomainError::index_out_of_range("start", 5, 1));
            assert_eq!(session.current_scene().id(), "start");
            assert!(session.history().is_empty());
        }

        #[test]
        fn ending_offers_no_choices() {
            let graph = Arc::new(StoryGraph::from_scenes(vec![
                Scene::new("start", "s").with_choice(Choice::new("finish", "end")),
                Scene::new("end", "The end."),
            ]));
            let mut session = ReadingSession::start(graph).unwrap();
            session.select_choice(0).unwrap();

            assert!(session.is_at_ending());
            assert!(session.available_choices().is_empty());
            assert!(matches!(
                session.select_choice(0),
                Err(DomainError::IndexOutOfRange { .. })
            ));
            assert_eq!(session.depth(), 1);
        }

        #[test]
        fn broken_link_leaves_state() {
            let graph = Arc::new(StoryGraph::from_scenes(vec![
                Scene::new("start", "s").with_choice(Choice::new("fall", "void"))
            ]));
            let mut session = ReadingSession::start(graph).unwrap();

            let err = session.select_choice(0).unwrap_err();

            assert_eq!(err, DomainError::broken_link("start", "void"));
            assert!(err.is_corruption());
            assert_eq!(session.current_scene().id(), "start");
            assert!(session.history().is_empty());
        }
    }

    mod go_back {
        use super::*;

        #[test]
        fn empty_history_is_a_no_op() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            assert!(!session.go_back());
            assert_eq!(session.current_scene().id(), "start");
        }

        #[test]
        fn pops_last_scene() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            session.select_choice(0).unwrap();
            session.select_choice(0).unwrap();

            assert!(session.go_back());
            assert_eq!(session.current_scene().id(), "A");
            assert_eq!(ids(session.history()), vec!["start"]);
        }

        #[test]
        fn depth_tracks_forward_moves_minus_backs_clamped() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            let moves: [Option<usize>; 8] =
                [Some(0), Some(0), None, None, None, Some(0), None, None];
            let mut expected: usize = 0;
            for step in moves {
                match step {
                    Some(index) => {
                        session.select_choice(index).unwrap();
                        expected += 1;
                    }
                    None => {
                        session.go_back();
                        expected = expected.saturating_sub(1);
                    }
                }
                assert_eq!(session.depth(), expected);
            }
            assert_eq!(session.current_scene().id(), "start");
        }
    }

    mod restart {
        use super::*;

        #[test]
        fn resets_to_entry_and_clears_history() {
            let mut session = ReadingSession::start(cycle_graph()).unwrap();
            session.select_choice(0).unwrap();
            session.select_choice(0).unwrap();
            session.select_choice(0).unwrap();

            let scene = session.restart().unwrap();
            assert_eq!(scene.id(), &SceneId::entry());
            assert!(session.history().is_empty());
        }
    }
}
