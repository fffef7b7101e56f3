//! Story mutation outcomes.

use crate::value_objects::{StoryDescription, StoryTitle};

/// Outcome of updating story fields.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryUpdate {
    TitleChanged {
        from: StoryTitle,
        to: StoryTitle,
    },
    DescriptionChanged {
        from: Option<StoryDescription>,
        to: Option<StoryDescription>,
    },
    CoverImageChanged {
        from: Option<String>,
        to: Option<String>,
    },
    /// The whole scene graph was written in one go.
    ScenesReplaced {
        previous_count: usize,
        scene_count: usize,
    },
}

impl StoryUpdate {
    /// Name of the story field this update touched.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleChanged { .. } => "title",
            Self::DescriptionChanged { .. } => "description",
            Self::CoverImageChanged { .. } => "cover_image",
            Self::ScenesReplaced { .. } => "scenes",
        }
    }

    /// False when the field was written with the value it already had.
    ///
    /// A scene replacement always counts as a change.
    pub fn is_change(&self) -> bool {
        match self {
            Self::TitleChanged { from, to } => from != to,
            Self::DescriptionChanged { from, to } => from != to,
            Self::CoverImageChanged { from, to } => from != to,
            Self::ScenesReplaced { .. } => true,
        }
    }
}
