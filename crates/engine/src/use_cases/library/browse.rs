//! Browse the public library.

use std::sync::Arc;

use serde::Serialize;

use branchtale_domain::Story;

use crate::infrastructure::ports::{StoryOrder, StoryRepo};

use super::{LibraryError, StorySummary};

/// Stories per page on the browse grid.
pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const MAX_PAGE_SIZE: usize = 100;

/// Browse filters. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub order: StoryOrder,
    pub page: usize,
    pub per_page: usize,
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            search: None,
            order: StoryOrder::NewestFirst,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryPage {
    pub stories: Vec<StorySummary>,
    pub page: usize,
    pub per_page: usize,
    /// Matches across all pages.
    pub total: usize,
    pub total_pages: usize,
}

pub struct BrowseStories {
    stories: Arc<dyn StoryRepo>,
}

impl BrowseStories {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    /// Search, sort and page the library.
    ///
    /// Search is a case-insensitive substring match on title or description.
    /// Out-of-range pages come back empty rather than failing.
    pub async fn execute(&self, query: BrowseQuery) -> Result<StoryPage, LibraryError> {
        let page = query.page.max(1);
        let per_page = query.per_page.clamp(1, MAX_PAGE_SIZE);
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matches: Vec<Story> = self
            .stories
            .list_all(query.order)
            .await?
            .into_iter()
            .filter(|story| needle.as_deref().map_or(true, |n| matches_search(story, n)))
            .collect();

        let total = matches.len();
        let stories = matches
            .iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .map(StorySummary::from)
            .collect();

        Ok(StoryPage {
            stories,
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        })
    }
}

fn matches_search(story: &Story, needle: &str) -> bool {
    story.title().as_str().to_lowercase().contains(needle)
        || story
            .description()
            .is_some_and(|d| d.as_str().to_lowercase().contains(needle))
}
