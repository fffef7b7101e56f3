//! Unified error types for the domain layer
//!
//! Every editor and traversal operation reports failures through [`DomainError`].
//! A failed operation never leaves a partially mutated graph or session behind.

use thiserror::Error;

use crate::ENTRY_SCENE_ID;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (empty choice text, unresolved choice target, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A scene with this id already exists in the story graph
    #[error("A scene with id '{0}' already exists")]
    DuplicateId(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Choice index outside the owning scene's choice list
    #[error("Choice index {index} is out of range for scene '{scene_id}' ({len} choices)")]
    IndexOutOfRange {
        scene_id: String,
        index: usize,
        len: usize,
    },

    /// The story graph has no entry scene, so it cannot be read
    #[error("Story has no entry scene '{}'", ENTRY_SCENE_ID)]
    MissingEntryPoint,

    /// A choice points at a scene that does not exist in the graph
    #[error("Scene '{scene_id}' has a choice leading to missing scene '{target}'")]
    BrokenLink { scene_id: String, target: String },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```
    /// use branchtale_domain::DomainError;
    ///
    /// let err = DomainError::validation("Choice text cannot be empty");
    /// assert_eq!(err.to_string(), "Validation failed: Choice text cannot be empty");
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a duplicate scene id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    /// Create an out-of-range choice index error
    pub fn index_out_of_range(scene_id: impl Into<String>, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            scene_id: scene_id.into(),
            index,
            len,
        }
    }

    /// Create a broken link error
    pub fn broken_link(scene_id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::BrokenLink {
            scene_id: scene_id.into(),
            target: target.into(),
        }
    }

    /// Whether this error means the stored story data is corrupt.
    ///
    /// The editor can never produce these graphs, so a reading session that hits
    /// one is over: the reader has to go back to the library.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::MissingEntryPoint | Self::BrokenLink { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_error() {
        let err = DomainError::duplicate_id("cave");
        assert!(matches!(err, DomainError::DuplicateId(_)));
        assert_eq!(err.to_string(), "A scene with id 'cave' already exists");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Scene", "forest");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.to_string(), "Scene not found: forest");
    }

    #[test]
    fn test_index_error() {
        let err = DomainError::index_out_of_range("start", 3, 2);
        assert_eq!(
            err.to_string(),
            "Choice index 3 is out of range for scene 'start' (2 choices)"
        );
    }

    #[test]
    fn test_missing_entry_point_mentions_start() {
        assert!(DomainError::MissingEntryPoint.to_string().contains("'start'"));
    }

    #[test]
    fn test_corruption_classification() {
        assert!(DomainError::MissingEntryPoint.is_corruption());
        assert!(DomainError::broken_link("start", "nowhere").is_corruption());
        assert!(!DomainError::validation("nope").is_corruption());
        assert!(!DomainError::index_out_of_range("start", 0, 0).is_corruption());
    }
}
