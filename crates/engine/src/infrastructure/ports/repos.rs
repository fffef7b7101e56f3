//! Repository port traits for database access.

use async_trait::async_trait;
use branchtale_domain::{Story, StoryId, UserId};

use super::error::RepoError;

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

// =============================================================================
// Story Storage
// =============================================================================

/// Whole-record story persistence.
///
/// The scene graph travels with the story as one value: `insert` writes it,
/// `update` replaces it wholesale. There is no per-scene write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryRepo: Send + Sync {
    async fn insert(&self, story: &Story) -> Result<(), RepoError>;

    /// Replace title, description, cover image, scenes and `updated_at`.
    /// Author and creation time never change. `NotFound` if the story is gone.
    async fn update(&self, story: &Story) -> Result<(), RepoError>;

    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError>;
    async fn delete(&self, id: StoryId) -> Result<(), RepoError>;

    // Queries
    async fn list_all(&self, order: StoryOrder) -> Result<Vec<Story>, RepoError>;
    async fn list_by_author(
        &self,
        author_id: UserId,
        order: StoryOrder,
    ) -> Result<Vec<Story>, RepoError>;
}
