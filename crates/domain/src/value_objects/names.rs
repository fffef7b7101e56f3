//! Validated text newtypes for story metadata
//!
//! These newtypes ensure that metadata is valid by construction:
//! - Titles are non-empty after trimming
//! - Both stay within length limits
//! - Both are trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for story titles
const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for story descriptions
const MAX_DESCRIPTION_LENGTH: usize = 5000;

// ============================================================================
// StoryTitle
// ============================================================================

/// A validated story title (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoryTitle(String);

impl StoryTitle {
    /// Create a new validated story title.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The title is empty after trimming
    /// - The title exceeds 200 characters after trimming
    ///
    /// # Example
    ///
    /// ```
    /// use branchtale_domain::StoryTitle;
    ///
    /// let title = StoryTitle::new("  The Lighthouse  ").unwrap();
    /// assert_eq!(title.as_str(), "The Lighthouse");
    /// assert!(StoryTitle::new("   ").is_err());
    /// ```
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Story title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(format!(
                "Story title cannot exceed {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StoryTitle {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StoryTitle> for String {
    fn from(title: StoryTitle) -> String {
        title.0
    }
}

// ============================================================================
// StoryDescription
// ============================================================================

/// A validated story description (may be empty, <=5000 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoryDescription(String);

impl StoryDescription {
    /// Create a new validated description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the description exceeds 5000 characters.
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into();
        let trimmed = description.trim();
        if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Story description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the description as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StoryDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StoryDescription {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StoryDescription> for String {
    fn from(description: StoryDescription) -> String {
        description.0
    }
}
