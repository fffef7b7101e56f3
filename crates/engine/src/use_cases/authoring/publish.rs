//! Publish a new story.

use std::sync::Arc;

use branchtale_domain::{Story, StoryGraph, UserId};

use crate::infrastructure::ports::{ClockPort, StoryRepo};

use super::{changed_fields, AuthoringError, StoryDraft};

pub struct PublishStory {
    stories: Arc<dyn StoryRepo>,
    clock: Arc<dyn ClockPort>,
}

impl PublishStory {
    pub fn new(stories: Arc<dyn StoryRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { stories, clock }
    }

    /// Validate `draft` and store it as a new story owned by `author_id`.
    ///
    /// The graph must already be structurally sound: a `"start"` scene, unique
    /// scene ids and no choice pointing at a missing scene.
    pub async fn execute(&self, author_id: UserId, draft: StoryDraft) -> Result<Story, AuthoringError> {
        let title = draft.title()?;
        let description = draft.description()?;
        let scenes = draft.scenes.unwrap_or_else(StoryGraph::new);
        scenes.check_structure()?;

        let mut story = Story::new(author_id, title, self.clock.now()).with_scenes(scenes);
        let details = [
            story.set_description(description),
            story.set_cover_image(draft.cover_image),
        ];

        self.stories.insert(&story).await?;

        tracing::info!(
            story_id = %story.id(),
            author_id = %author_id,
            scene_count = story.scenes().len(),
            details = ?changed_fields(&details),
            "Story published"
        );
        Ok(story)
    }
}
