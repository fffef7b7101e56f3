//! Story aggregate - the unit authors publish and readers play
//!
//! # Whole-Graph Persistence
//!
//! The scene graph is stored with the story as one structured value. Saving a
//! story rewrites the entire graph; there is no per-scene update path.
//!
//! # Rustic DDD Design
//!
//! This aggregate follows Rustic DDD principles:
//! - **Private fields**: All fields are encapsulated
//! - **Valid by construction**: `new()` takes pre-validated types
//! - **Builder pattern**: Fluent API for optional fields and loading

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::StoryGraph;
use crate::events::StoryUpdate;
use crate::ids::{StoryId, UserId};
use crate::value_objects::{StoryDescription, StoryTitle};

/// A published interactive story.
///
/// # Invariants
///
/// - A story always has a valid, non-empty `title`
/// - A story always belongs to an `author_id`
/// - A new story starts with the placeholder `"start"` scene only
///
/// # Example
///
/// ```
/// use branchtale_domain::{Story, StoryTitle, UserId};
///
/// let author = UserId::new();
/// let story = Story::new(author, StoryTitle::new("The Lighthouse").unwrap(), chrono::Utc::now());
///
/// assert!(story.is_authored_by(author));
/// assert_eq!(story.scenes().len(), 1);
/// assert!(story.scenes().entry_scene().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    // Identity
    id: StoryId,
    author_id: UserId,

    // Presentation
    title: StoryTitle,
    description: Option<StoryDescription>,
    /// Public URL returned by the image relay, stored verbatim
    cover_image: Option<String>,

    // Content
    scenes: StoryGraph,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Story {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a new story owned by `author_id` with the default scene graph.
    pub fn new(author_id: UserId, title: StoryTitle, now: DateTime<Utc>) -> Self {
        Self {
            id: StoryId::new(),
            author_id,
            title,
            description: None,
            cover_image: None,
            scenes: StoryGraph::default(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> StoryId {
        self.id
    }

    #[inline]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    #[inline]
    pub fn title(&self) -> &StoryTitle {
        &self.title
    }

    #[inline]
    pub fn description(&self) -> Option<&StoryDescription> {
        self.description.as_ref()
    }

    #[inline]
    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    #[inline]
    pub fn scenes(&self) -> &StoryGraph {
        &self.scenes
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Ownership check used before any edit, save or delete.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    // =========================================================================
    // Builder Methods (for construction and loading)
    // =========================================================================

    /// Set the story's ID (used when loading from storage).
    pub fn with_id(mut self, id: StoryId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: StoryDescription) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_cover_image(mut self, url: impl Into<String>) -> Self {
        self.cover_image = Some(url.into());
        self
    }

    pub fn with_scenes(mut self, scenes: StoryGraph) -> Self {
        self.scenes = scenes;
        self
    }

    /// Set both timestamps (used when loading from storage).
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    pub fn set_title(&mut self, title: StoryTitle) -> StoryUpdate {
        let previous = std::mem::replace(&mut self.title, title);
        StoryUpdate::TitleChanged {
            from: previous,
            to: self.title.clone(),
        }
    }

    /// Empty descriptions are stored as `None`.
    pub fn set_description(&mut self, description: Option<StoryDescription>) -> StoryUpdate {
        let next = description.filter(|d| !d.is_empty());
        let previous = std::mem::replace(&mut self.description, next);
        StoryUpdate::DescriptionChanged {
            from: previous,
            to: self.description.clone(),
        }
    }

    pub fn set_cover_image(&mut self, url: Option<String>) -> StoryUpdate {
        let next = url.filter(|u| !u.trim().is_empty());
        let previous = std::mem::replace(&mut self.cover_image, next);
        StoryUpdate::CoverImageChanged {
            from: previous,
            to: self.cover_image.clone(),
        }
    }

    /// Swap in a whole new scene graph.
    pub fn replace_scenes(&mut self, scenes: StoryGraph) -> StoryUpdate {
        let previous = std::mem::replace(&mut self.scenes, scenes);
        StoryUpdate::ScenesReplaced {
            previous_count: previous.len(),
            scene_count: self.scenes.len(),
        }
    }

    /// Record that the story was saved at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format matching the persisted record shape.
#[derive(Serialize, Deserialize)]
struct StoryWireFormat {
    id: StoryId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cover_image: Option<String>,
    author_id: UserId,
    #[serde(default)]
    scenes: StoryGraph,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Story {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = StoryWireFormat {
            id: self.id,
            title: self.title.to_string(),
            description: self.description.as_ref().map(|d| d.to_string()),
            cover_image: self.cover_image.clone(),
            author_id: self.author_id,
            scenes: self.scenes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Story {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = StoryWireFormat::deserialize(deserializer)?;

        let title = StoryTitle::new(wire.title).map_err(DeError::custom)?;
        let description = wire
            .description
            .map(StoryDescription::new)
            .transpose()
            .map_err(DeError::custom)?
            .filter(|d| !d.is_empty());

        Ok(Story {
            id: wire.id,
            author_id: wire.author_id,
            title,
            description,
            cover_image: wire.cover_image.filter(|u| !u.trim().is_empty()),
            scenes: wire.scenes,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
