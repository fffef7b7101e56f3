//! Delete a story.

use std::sync::Arc;

use branchtale_domain::{StoryId, UserId};

use crate::infrastructure::ports::StoryRepo;

use super::{load_owned, AuthoringError};

pub struct DeleteStory {
    stories: Arc<dyn StoryRepo>,
}

impl DeleteStory {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    pub async fn execute(&self, user_id: UserId, story_id: StoryId) -> Result<(), AuthoringError> {
        load_owned(self.stories.as_ref(), user_id, story_id).await?;
        self.stories.delete(story_id).await?;
        tracing::info!(story_id = %story_id, "Story deleted");
        Ok(())
    }
}
