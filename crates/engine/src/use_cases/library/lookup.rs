//! Single-story and per-author lookups.

use std::sync::Arc;

use branchtale_domain::{Story, StoryId, UserId};

use crate::infrastructure::ports::{StoryOrder, StoryRepo};

use super::{LibraryError, StorySummary};

/// Fetch a full story, scenes included, for the reader.
pub struct GetStory {
    stories: Arc<dyn StoryRepo>,
}

impl GetStory {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    pub async fn execute(&self, story_id: StoryId) -> Result<Story, LibraryError> {
        self.stories
            .get(story_id)
            .await?
            .ok_or(LibraryError::StoryNotFound(story_id))
    }
}

/// An author's own shelf, newest first.
pub struct ListAuthorStories {
    stories: Arc<dyn StoryRepo>,
}

impl ListAuthorStories {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    pub async fn execute(&self, author_id: UserId) -> Result<Vec<StorySummary>, LibraryError> {
        let stories = self
            .stories
            .list_by_author(author_id, StoryOrder::NewestFirst)
            .await?;
        Ok(stories.iter().map(StorySummary::from).collect())
    }
}
