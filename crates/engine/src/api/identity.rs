//! Caller identity.
//!
//! Sign-in lives with the external identity provider. Its session layer
//! forwards the authenticated user's id in the `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use branchtale_domain::UserId;

use super::http::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let id = Uuid::parse_str(raw).map_err(|_| ApiError::Unauthorized)?;
        Ok(Self(UserId::from_uuid(id)))
    }
}
