//! Imgur image relay client
//!
//! Implements the ImageHostPort trait by forwarding uploads to Imgur's
//! anonymous image API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::infrastructure::ports::{ImageHostError, ImageHostPort, ImageUpload};

pub const DEFAULT_IMGUR_API_URL: &str = "https://api.imgur.com/3/image";

/// Client for the Imgur upload API
#[derive(Clone)]
pub struct ImgurClient {
    client: Client,
    api_url: String,
    client_id: Option<String>,
}

impl ImgurClient {
    /// `client_id` may be absent; uploads then fail with `NotConfigured`
    /// while the rest of the engine keeps running.
    pub fn new(api_url: &str, client_id: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: api_url.to_string(),
            client_id: client_id.filter(|id| !id.trim().is_empty()),
        }
    }

    fn form_for(image: ImageUpload) -> Result<Form, ImageHostError> {
        let mut part = Part::bytes(image.bytes)
            .file_name(image.file_name.unwrap_or_else(|| "cover".to_string()));
        if let Some(content_type) = image.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| ImageHostError::RequestFailed(e.to_string()))?;
        }
        Ok(Form::new().part("image", part))
    }
}

#[async_trait]
impl ImageHostPort for ImgurClient {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ImageHostError::NotConfigured)?;

        let size = image.bytes.len();
        let form = Self::form_for(image)?;

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Client-ID {}", client_id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageHostError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, size, "Imgur rejected upload");
            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let link = parse_upload_response(&body)?;
        tracing::debug!(size, link = %link, "Image relayed to Imgur");
        Ok(link)
    }
}

// =============================================================================
// Response parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    status: Option<u16>,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    link: Option<String>,
    error: Option<serde_json::Value>,
}

/// Pull the public link out of an Imgur upload response.
fn parse_upload_response(body: &str) -> Result<String, ImageHostError> {
    let response: UploadResponse = serde_json::from_str(body)
        .map_err(|e| ImageHostError::InvalidResponse(e.to_string()))?;

    let data = response
        .data
        .ok_or_else(|| ImageHostError::InvalidResponse("missing data".to_string()))?;

    if !response.success {
        let reason = data
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "upload unsuccessful".to_string());
        return Err(ImageHostError::Rejected {
            status: response.status.unwrap_or(0),
            body: reason,
        });
    }

    data.link
        .filter(|link| !link.is_empty())
        .ok_or_else(|| ImageHostError::InvalidResponse("missing link".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_link_from_successful_response() {
        let body = r#"{"data":{"id":"abc","link":"https://i.imgur.com/abc.png"},"success":true,"status":200}"#;
        assert_eq!(
            parse_upload_response(body).unwrap(),
            "https://i.imgur.com/abc.png"
        );
    }

    #[test]
    fn unsuccessful_response_is_rejected() {
        let body = r#"{"data":{"error":"File is over the size limit"},"success":false,"status":400}"#;
        match parse_upload_response(body).unwrap_err() {
            ImageHostError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("size limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_link_is_invalid() {
        let body = r#"{"data":{"id":"abc"},"success":true}"#;
        assert!(matches!(
            parse_upload_response(body),
            Err(ImageHostError::InvalidResponse(_))
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            parse_upload_response("<html>"),
            Err(ImageHostError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn upload_without_client_id_is_not_configured() {
        let client = ImgurClient::new(DEFAULT_IMGUR_API_URL, Some("  ".to_string()));
        let err = client
            .upload(ImageUpload {
                bytes: vec![1, 2, 3],
                file_name: None,
                content_type: Some("image/png".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ImageHostError::NotConfigured));
    }
}
