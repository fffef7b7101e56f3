//! Asset use cases: cover image uploads.

use std::sync::Arc;

use crate::infrastructure::ports::{ImageHostError, ImageHostPort, ImageUpload};

/// Upload limit used when nothing is configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Container for asset use cases.
pub struct AssetUseCases {
    pub upload_cover: Arc<UploadCoverImage>,
}

impl AssetUseCases {
    pub fn new(upload_cover: Arc<UploadCoverImage>) -> Self {
        Self { upload_cover }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("No image data received")]
    Empty,
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("Image is {size} bytes; the limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("Image upload failed: {0}")]
    Relay(#[from] ImageHostError),
}

/// Relay a cover image to the image host and return its public URL.
pub struct UploadCoverImage {
    host: Arc<dyn ImageHostPort>,
    max_bytes: usize,
}

impl UploadCoverImage {
    pub fn new(host: Arc<dyn ImageHostPort>, max_bytes: usize) -> Self {
        Self { host, max_bytes }
    }

    /// A missing content type is let through; the host makes the final call.
    pub async fn execute(&self, image: ImageUpload) -> Result<String, AssetError> {
        if image.bytes.is_empty() {
            return Err(AssetError::Empty);
        }
        if let Some(content_type) = image.content_type.as_deref() {
            if !content_type.starts_with("image/") {
                return Err(AssetError::UnsupportedType(content_type.to_string()));
            }
        }
        let size = image.bytes.len();
        if size > self.max_bytes {
            return Err(AssetError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let url = self.host.upload(image).await.inspect_err(|e| {
            tracing::error!(error = %e, size, "Cover image relay failed");
        })?;
        tracing::info!(size, url = %url, "Cover image uploaded");
        Ok(url)
    }
}
