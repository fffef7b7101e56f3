//! Authoring use cases: publishing, editing and deleting stories.
//!
//! Every operation that touches an existing story takes the acting user
//! explicitly and refuses to proceed unless that user is the author.

use std::sync::Arc;

use serde::Deserialize;

use branchtale_domain::{
    DomainError, Story, StoryDescription, StoryGraph, StoryId, StoryTitle, StoryUpdate, UserId,
};

use crate::infrastructure::ports::{RepoError, StoryRepo};

mod delete;
mod edit;
mod publish;

pub use delete::DeleteStory;
pub use edit::{EditStoryGraph, LoadStoryForEditing, SaveStory};
pub use publish::PublishStory;

/// Container for authoring use cases.
pub struct AuthoringUseCases {
    pub publish: Arc<PublishStory>,
    pub load: Arc<LoadStoryForEditing>,
    pub save: Arc<SaveStory>,
    pub edit: Arc<EditStoryGraph>,
    pub delete: Arc<DeleteStory>,
}

impl AuthoringUseCases {
    pub fn new(
        publish: Arc<PublishStory>,
        load: Arc<LoadStoryForEditing>,
        save: Arc<SaveStory>,
        edit: Arc<EditStoryGraph>,
        delete: Arc<DeleteStory>,
    ) -> Self {
        Self {
            publish,
            load,
            save,
            edit,
            delete,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Only the author can change this story")]
    Forbidden,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Story fields as submitted by the editor form.
///
/// `scenes` is optional on publish; a new story then starts from the
/// placeholder graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub scenes: Option<StoryGraph>,
}

impl StoryDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_scenes(mut self, scenes: StoryGraph) -> Self {
        self.scenes = Some(scenes);
        self
    }

    fn title(&self) -> Result<StoryTitle, DomainError> {
        StoryTitle::new(self.title.as_str())
    }

    fn description(&self) -> Result<Option<StoryDescription>, DomainError> {
        self.description
            .as_deref()
            .map(StoryDescription::new)
            .transpose()
    }
}

/// Names of the fields whose value actually changed.
fn changed_fields(updates: &[StoryUpdate]) -> Vec<&'static str> {
    updates
        .iter()
        .filter(|update| update.is_change())
        .map(StoryUpdate::field)
        .collect()
}

/// Fetch a story and make sure `user_id` wrote it.
async fn load_owned(
    stories: &dyn StoryRepo,
    user_id: UserId,
    story_id: StoryId,
) -> Result<Story, AuthoringError> {
    let story = stories
        .get(story_id)
        .await?
        .ok_or(AuthoringError::StoryNotFound(story_id))?;

    if !story.is_authored_by(user_id) {
        tracing::warn!(
            story_id = %story_id,
            user_id = %user_id,
            "Rejected change from non-author"
        );
        return Err(AuthoringError::Forbidden);
    }
    Ok(story)
}

#[cfg(test)]
pub(crate) mod test_support {
    use branchtale_domain::{Story, StoryTitle, UserId};
    use chrono::{DateTime, TimeZone, Utc};

    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    pub fn saved_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()
    }

    pub fn story_by(author: UserId) -> Story {
        Story::new(author, StoryTitle::new("The Lighthouse").unwrap(), created_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::story_by;

    #[test]
    fn changed_fields_skips_rewrites_of_same_value() {
        let mut story = story_by(UserId::new());
        let updates = [
            story.set_title(StoryTitle::new("The Lighthouse").unwrap()),
            story.set_description(Some(StoryDescription::new("Fog and rocks").unwrap())),
            story.set_cover_image(None),
        ];

        assert_eq!(changed_fields(&updates), vec!["description"]);
    }
}
