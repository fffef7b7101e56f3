use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved id of the scene every reading session starts from.
pub const ENTRY_SCENE_ID: &str = "start";

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Aggregate IDs
define_id!(StoryId);

// Identity provider IDs (opaque, only compared for ownership)
define_id!(UserId);

/// Author-chosen scene identifier, unique within one story.
///
/// Scene ids are free text picked in the editor (`"forest"`, `"ending1"`), so
/// unlike the UUID ids this type does not validate its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of the entry scene.
    pub fn entry() -> Self {
        Self(ENTRY_SCENE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_entry(&self) -> bool {
        self.0 == ENTRY_SCENE_ID
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<SceneId> for String {
    fn from(value: SceneId) -> Self {
        value.0
    }
}

impl AsRef<str> for SceneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SceneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_id_serializes_as_plain_string() {
        let id = SceneId::new("forest");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"forest\"");
        let back: SceneId = serde_json::from_str("\"forest\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn entry_id_is_start() {
        assert!(SceneId::entry().is_entry());
        assert_eq!(SceneId::entry(), "start");
        assert!(!SceneId::new("Start").is_entry());
    }

    #[test]
    fn uuid_ids_are_distinct() {
        assert_ne!(StoryId::new(), StoryId::new());
        let uuid = Uuid::new_v4();
        assert_eq!(UserId::from_uuid(uuid).to_uuid(), uuid);
    }
}
