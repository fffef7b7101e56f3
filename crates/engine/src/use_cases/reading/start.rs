//! Open a story for reading.

use std::sync::Arc;

use branchtale_domain::{ReadingSession, StoryId};

use crate::infrastructure::ports::StoryRepo;
use crate::stores::ReadingSessionStore;

use super::{ReadingError, ReadingView};

pub struct StartReading {
    stories: Arc<dyn StoryRepo>,
    sessions: Arc<ReadingSessionStore>,
}

impl StartReading {
    pub fn new(stories: Arc<dyn StoryRepo>, sessions: Arc<ReadingSessionStore>) -> Self {
        Self { stories, sessions }
    }

    /// Load the story and place the reader at its `"start"` scene.
    ///
    /// The graph is snapshotted; later saves by the author do not affect an
    /// open session.
    pub async fn execute(&self, story_id: StoryId) -> Result<ReadingView, ReadingError> {
        let story = self
            .stories
            .get(story_id)
            .await?
            .ok_or(ReadingError::StoryNotFound(story_id))?;

        let session = ReadingSession::start(Arc::new(story.scenes().clone())).inspect_err(|e| {
            tracing::warn!(story_id = %story_id, error = %e, "Story cannot be read");
        })?;

        let view_session = session.clone();
        let session_id = self.sessions.open(story_id, session);
        tracing::debug!(session_id = %session_id, story_id = %story_id, "Reading started");

        Ok(ReadingView::of(session_id, story_id, &view_session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::reading_sessions::test_store;
    use crate::infrastructure::ports::MockStoryRepo;
    use branchtale_domain::{
        Choice, DomainError, Scene, Story, StoryGraph, StoryTitle, UserId, DEFAULT_ENTRY_TEXT,
    };

    fn repo_with(story: Story) -> MockStoryRepo {
        let mut repo = MockStoryRepo::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(story.clone())));
        repo
    }

    fn story(scenes: StoryGraph) -> Story {
        Story::new(UserId::new(), StoryTitle::new("Tale").unwrap(), chrono::Utc::now())
            .with_scenes(scenes)
    }

    #[tokio::test]
    async fn opens_session_at_entry_scene() {
        let story = story(StoryGraph::from_scenes(vec![
            Scene::new("start", "A door.").with_choice(Choice::new("Open it", "room")),
            Scene::new("room", "Empty."),
        ]));
        let story_id = story.id();
        let sessions = Arc::new(test_store());
        let use_case = StartReading::new(Arc::new(repo_with(story)), sessions.clone());

        let view = use_case.execute(story_id).await.unwrap();

        assert_eq!(view.scene_id, "start");
        assert_eq!(view.text, "A door.");
        assert_eq!(view.choices.len(), 1);
        assert_eq!(view.choices[0].text, "Open it");
        assert!(!view.can_go_back);
        assert!(!view.is_ending);
        assert_eq!(sessions.get(view.session_id).unwrap().story_id, story_id);
    }

    #[tokio::test]
    async fn placeholder_story_starts_at_an_ending() {
        let story = story(StoryGraph::new());
        let story_id = story.id();
        let use_case = StartReading::new(
            Arc::new(repo_with(story)),
            Arc::new(test_store()),
        );

        let view = use_case.execute(story_id).await.unwrap();

        assert_eq!(view.text, DEFAULT_ENTRY_TEXT);
        assert!(view.is_ending);
    }

    #[tokio::test]
    async fn story_without_start_opens_no_session() {
        let story = story(StoryGraph::from_scenes(vec![Scene::new("A", "a")]));
        let story_id = story.id();
        let sessions = Arc::new(test_store());
        let use_case = StartReading::new(Arc::new(repo_with(story)), sessions.clone());

        let err = use_case.execute(story_id).await.unwrap_err();

        assert!(matches!(
            err,
            ReadingError::Domain(DomainError::MissingEntryPoint)
        ));
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn missing_story_is_not_found() {
        let mut repo = MockStoryRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        let use_case = StartReading::new(Arc::new(repo), Arc::new(test_store()));

        let err = use_case.execute(StoryId::new()).await.unwrap_err();

        assert!(matches!(err, ReadingError::StoryNotFound(_)));
    }
}
