//! External service ports.

use async_trait::async_trait;

use super::error::ImageHostError;

/// Raw image received from an author, to be relayed to the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Image hosting behind the upload relay. Returns a publicly reachable URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHostPort: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError>;
}
