//! Library use cases: browsing and fetching published stories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use branchtale_domain::{Story, StoryId, UserId};

use crate::infrastructure::ports::RepoError;

mod browse;
mod lookup;

pub use browse::{BrowseQuery, BrowseStories, StoryPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use lookup::{GetStory, ListAuthorStories};

/// Container for library use cases.
pub struct LibraryUseCases {
    pub browse: Arc<BrowseStories>,
    pub get: Arc<GetStory>,
    pub by_author: Arc<ListAuthorStories>,
}

impl LibraryUseCases {
    pub fn new(
        browse: Arc<BrowseStories>,
        get: Arc<GetStory>,
        by_author: Arc<ListAuthorStories>,
    ) -> Self {
        Self {
            browse,
            get,
            by_author,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Card-sized view of a story for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorySummary {
    pub id: StoryId,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub author_id: UserId,
    pub scene_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Story> for StorySummary {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id(),
            title: story.title().to_string(),
            description: story.description().map(|d| d.to_string()),
            cover_image: story.cover_image().map(str::to_string),
            author_id: story.author_id(),
            scene_count: story.scenes().len(),
            created_at: story.created_at(),
            updated_at: story.updated_at(),
        }
    }
}
