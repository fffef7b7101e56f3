//! Load, save and edit an existing story.

use std::sync::Arc;

use branchtale_domain::editor::{apply_edits, GraphEdit};
use branchtale_domain::{Story, StoryId, UserId};

use crate::infrastructure::ports::{ClockPort, StoryRepo};

use super::{changed_fields, load_owned, AuthoringError, StoryDraft};

/// Open a story in the editor.
pub struct LoadStoryForEditing {
    stories: Arc<dyn StoryRepo>,
}

impl LoadStoryForEditing {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    pub async fn execute(&self, user_id: UserId, story_id: StoryId) -> Result<Story, AuthoringError> {
        load_owned(self.stories.as_ref(), user_id, story_id).await
    }
}

/// Save the editor form back over the stored story.
///
/// The whole record is replaced, scene graph included. A draft without scenes
/// keeps the stored graph.
pub struct SaveStory {
    stories: Arc<dyn StoryRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SaveStory {
    pub fn new(stories: Arc<dyn StoryRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { stories, clock }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        story_id: StoryId,
        draft: StoryDraft,
    ) -> Result<Story, AuthoringError> {
        let mut story = load_owned(self.stories.as_ref(), user_id, story_id).await?;

        let title = draft.title()?;
        let description = draft.description()?;
        if let Some(scenes) = &draft.scenes {
            scenes.check_structure()?;
        }

        let mut updates = vec![
            story.set_title(title),
            story.set_description(description),
            story.set_cover_image(draft.cover_image),
        ];
        if let Some(scenes) = draft.scenes {
            updates.push(story.replace_scenes(scenes));
        }
        story.touch(self.clock.now());

        self.stories.update(&story).await?;

        tracing::info!(
            story_id = %story_id,
            scene_count = story.scenes().len(),
            changed = ?changed_fields(&updates),
            "Story saved"
        );
        Ok(story)
    }
}

/// Apply a batch of editor operations and persist the resulting graph.
pub struct EditStoryGraph {
    stories: Arc<dyn StoryRepo>,
    clock: Arc<dyn ClockPort>,
}

impl EditStoryGraph {
    pub fn new(stories: Arc<dyn StoryRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { stories, clock }
    }

    /// All edits apply or none do. Nothing is written if any edit fails.
    pub async fn execute(
        &self,
        user_id: UserId,
        story_id: StoryId,
        edits: &[GraphEdit],
    ) -> Result<Story, AuthoringError> {
        let mut story = load_owned(self.stories.as_ref(), user_id, story_id).await?;

        let edited = apply_edits(story.scenes(), edits)?;
        edited.check_structure()?;

        let update = story.replace_scenes(edited);
        story.touch(self.clock.now());
        self.stories.update(&story).await?;

        tracing::debug!(
            story_id = %story_id,
            edits = edits.len(),
            update = ?update,
            "Story graph edited"
        );
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockClockPort, MockStoryRepo};
    use crate::use_cases::authoring::test_support::{saved_at, story_by};
    use branchtale_domain::{Choice, DomainError, Scene, StoryGraph};
    use mockall::predicate::eq;

    fn clock() -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(saved_at);
        Arc::new(clock)
    }

    fn repo_with(story: Story) -> MockStoryRepo {
        let mut repo = MockStoryRepo::new();
        let id = story.id();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(story.clone())));
        repo
    }

    mod load {
        use super::*;

        #[tokio::test]
        async fn author_gets_story() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();
            let use_case = LoadStoryForEditing::new(Arc::new(repo_with(story)));

            let loaded = use_case.execute(author, id).await.unwrap();

            assert_eq!(loaded.id(), id);
        }

        #[tokio::test]
        async fn other_user_is_forbidden() {
            let story = story_by(UserId::new());
            let id = story.id();
            let use_case = LoadStoryForEditing::new(Arc::new(repo_with(story)));

            let err = use_case.execute(UserId::new(), id).await.unwrap_err();

            assert!(matches!(err, AuthoringError::Forbidden));
        }

        #[tokio::test]
        async fn missing_story_is_not_found() {
            let mut repo = MockStoryRepo::new();
            repo.expect_get().returning(|_| Ok(None));
            let use_case = LoadStoryForEditing::new(Arc::new(repo));

            let err = use_case
                .execute(UserId::new(), StoryId::new())
                .await
                .unwrap_err();

            assert!(matches!(err, AuthoringError::StoryNotFound(_)));
        }
    }

    mod save {
        use super::*;

        #[tokio::test]
        async fn replaces_fields_and_bumps_updated_at() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();
            let created = story.created_at();
            let graph = StoryGraph::from_scenes(vec![
                Scene::new("start", "Waves").with_choice(Choice::new("Climb", "top")),
                Scene::new("top", "The lamp is lit."),
            ]);
            let expected_graph = graph.clone();

            let mut repo = repo_with(story);
            repo.expect_update()
                .withf(move |s: &Story| {
                    s.title().as_str() == "Lamp"
                        && s.scenes() == &expected_graph
                        && s.updated_at() == saved_at()
                        && s.created_at() == created
                })
                .times(1)
                .returning(|_| Ok(()));

            let use_case = SaveStory::new(Arc::new(repo), clock());
            let draft = StoryDraft {
                title: "Lamp".to_string(),
                description: Some("Tall and white".to_string()),
                cover_image: Some("https://i.imgur.com/lamp.png".to_string()),
                scenes: Some(graph),
            };

            let saved = use_case.execute(author, id, draft).await.unwrap();

            assert_eq!(saved.description().unwrap().as_str(), "Tall and white");
            assert_eq!(saved.cover_image(), Some("https://i.imgur.com/lamp.png"));
            assert!(saved.is_authored_by(author));
        }

        #[tokio::test]
        async fn draft_without_scenes_keeps_stored_graph() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();
            let stored_graph = story.scenes().clone();

            let mut repo = repo_with(story);
            repo.expect_update()
                .withf(move |s: &Story| s.scenes() == &stored_graph)
                .returning(|_| Ok(()));

            let use_case = SaveStory::new(Arc::new(repo), clock());
            use_case
                .execute(author, id, StoryDraft::new("Renamed"))
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn non_author_cannot_save() {
            let story = story_by(UserId::new());
            let id = story.id();
            let use_case = SaveStory::new(Arc::new(repo_with(story)), clock());

            let err = use_case
                .execute(UserId::new(), id, StoryDraft::new("Hijacked"))
                .await
                .unwrap_err();

            assert!(matches!(err, AuthoringError::Forbidden));
        }

        #[tokio::test]
        async fn duplicate_scene_ids_are_rejected() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();
            let use_case = SaveStory::new(Arc::new(repo_with(story)), clock());
            let draft = StoryDraft::new("Twins").with_scenes(StoryGraph::from_scenes(vec![
                Scene::new("start", "one"),
                Scene::new("start", "two"),
            ]));

            let err = use_case.execute(author, id, draft).await.unwrap_err();

            assert!(matches!(
                err,
                AuthoringError::Domain(DomainError::DuplicateId(_))
            ));
        }
    }

    mod edit {
        use super::*;

        #[tokio::test]
        async fn batch_creates_and_links_scene() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();

            let mut repo = repo_with(story);
            repo.expect_update()
                .withf(|s: &Story| {
                    s.scenes().contains("cave")
                        && s.scenes().entry_scene().map(|e| e.choices().len()) == Ok(1)
                })
                .times(1)
                .returning(|_| Ok(()));

            let use_case = EditStoryGraph::new(Arc::new(repo), clock());
            let edits = vec![
                GraphEdit::CreateScene {
                    id: "cave".into(),
                    text: "Damp and dark".into(),
                },
                GraphEdit::AddChoice {
                    scene_id: "start".into(),
                    choice: Choice::new("Enter", "cave"),
                },
            ];

            let story = use_case.execute(author, id, &edits).await.unwrap();

            assert_eq!(story.scenes().len(), 2);
            assert_eq!(story.updated_at(), saved_at());
        }

        #[tokio::test]
        async fn failing_edit_writes_nothing() {
            let author = UserId::new();
            let story = story_by(author);
            let id = story.id();
            let use_case = EditStoryGraph::new(Arc::new(repo_with(story)), clock());
            let edits = vec![
                GraphEdit::CreateScene {
                    id: "cave".into(),
                    text: "Damp".into(),
                },
                GraphEdit::CreateScene {
                    id: "start".into(),
                    text: "Again".into(),
                },
            ];

            let err = use_case.execute(author, id, &edits).await.unwrap_err();

            assert!(matches!(
                err,
                AuthoringError::Domain(DomainError::DuplicateId(_))
            ));
        }
    }
}
