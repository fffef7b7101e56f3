//! HTTP routes.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use branchtale_domain::{DomainError, GraphEdit, Story, StoryId, UserId};

use crate::api::identity::CurrentUser;
use crate::app::App;
use crate::infrastructure::ports::{ImageUpload, RepoError, StoryOrder};
use crate::use_cases::assets::AssetError;
use crate::use_cases::authoring::{AuthoringError, StoryDraft};
use crate::use_cases::library::{
    BrowseQuery, LibraryError, StoryPage, StorySummary, DEFAULT_PAGE_SIZE,
};
use crate::use_cases::reading::{ReadingError, ReadingView};

/// Room for multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create all HTTP routes.
///
/// `max_upload_bytes` caps the image upload body; every other route keeps the
/// framework default.
pub fn routes(max_upload_bytes: usize) -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/stories", get(browse_stories).post(publish_story))
        .route(
            "/api/stories/{id}",
            get(get_story).put(save_story).delete(delete_story),
        )
        .route("/api/stories/{id}/edit", get(load_story_for_editing))
        .route("/api/stories/{id}/edits", post(edit_story_graph))
        .route("/api/users/{id}/stories", get(list_author_stories))
        .route(
            "/api/upload",
            post(upload_image).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
        .route("/api/stories/{id}/readings", post(start_reading))
        .route(
            "/api/readings/{session}",
            get(view_reading).delete(end_reading),
        )
        .route(
            "/api/readings/{session}/choices/{index}",
            post(choose_option),
        )
        .route("/api/readings/{session}/back", post(go_back))
        .route("/api/readings/{session}/restart", post(restart_reading))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Library
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct BrowseParams {
    search: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

async fn browse_stories(
    State(app): State<Arc<App>>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<StoryPage>, ApiError> {
    let order = parse_sort(params.sort.as_deref())?;
    let page = app
        .use_cases
        .library
        .browse
        .execute(BrowseQuery {
            search: params.search,
            order,
            page: params.page.unwrap_or(1),
            per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        })
        .await?;
    Ok(Json(page))
}

fn parse_sort(value: Option<&str>) -> Result<StoryOrder, ApiError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("newest") => Ok(StoryOrder::NewestFirst),
        Some("oldest") => Ok(StoryOrder::OldestFirst),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown sort '{other}', expected 'newest' or 'oldest'"
        ))),
    }
}

async fn get_story(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Story>, ApiError> {
    let story = app
        .use_cases
        .library
        .get
        .execute(StoryId::from_uuid(id))
        .await?;
    Ok(Json(story))
}

async fn list_author_stories(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StorySummary>>, ApiError> {
    let stories = app
        .use_cases
        .library
        .by_author
        .execute(UserId::from_uuid(id))
        .await?;
    Ok(Json(stories))
}

// =============================================================================
// Authoring
// =============================================================================

async fn publish_story(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Json(draft): Json<StoryDraft>,
) -> Result<(StatusCode, Json<Story>), ApiError> {
    let story = app
        .use_cases
        .authoring
        .publish
        .execute(user_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(story)))
}

async fn load_story_for_editing(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Story>, ApiError> {
    let story = app
        .use_cases
        .authoring
        .load
        .execute(user_id, StoryId::from_uuid(id))
        .await?;
    Ok(Json(story))
}

async fn save_story(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<StoryDraft>,
) -> Result<Json<Story>, ApiError> {
    let story = app
        .use_cases
        .authoring
        .save
        .execute(user_id, StoryId::from_uuid(id), draft)
        .await?;
    Ok(Json(story))
}

#[derive(Debug, Deserialize)]
struct EditRequest {
    edits: Vec<GraphEdit>,
}

async fn edit_story_graph(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EditRequest>,
) -> Result<Json<Story>, ApiError> {
    let story = app
        .use_cases
        .authoring
        .edit
        .execute(user_id, StoryId::from_uuid(id), &request.edits)
        .await?;
    Ok(Json(story))
}

async fn delete_story(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .authoring
        .delete
        .execute(user_id, StoryId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Uploads
// =============================================================================

#[derive(Debug, Serialize)]
struct UploadResponse {
    url: String,
}

async fn upload_image(
    State(app): State<Arc<App>>,
    CurrentUser(_user_id): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let url = app
            .use_cases
            .assets
            .upload_cover
            .execute(ImageUpload {
                bytes: bytes.to_vec(),
                file_name,
                content_type,
            })
            .await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(ApiError::BadRequest("Missing 'image' field".to_string()))
}

// =============================================================================
// Reading
// =============================================================================

async fn start_reading(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReadingView>), ApiError> {
    let view = app
        .use_cases
        .reading
        .start
        .execute(StoryId::from_uuid(id))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn view_reading(
    State(app): State<Arc<App>>,
    Path(session): Path<Uuid>,
) -> Result<Json<ReadingView>, ApiError> {
    Ok(Json(app.use_cases.reading.view.execute(session)?))
}

async fn choose_option(
    State(app): State<Arc<App>>,
    Path((session, index)): Path<(Uuid, usize)>,
) -> Result<Json<ReadingView>, ApiError> {
    Ok(Json(app.use_cases.reading.choose.execute(session, index)?))
}

async fn go_back(
    State(app): State<Arc<App>>,
    Path(session): Path<Uuid>,
) -> Result<Json<ReadingView>, ApiError> {
    Ok(Json(app.use_cases.reading.back.execute(session)?))
}

async fn restart_reading(
    State(app): State<Arc<App>>,
    Path(session): Path<Uuid>,
) -> Result<Json<ReadingView>, ApiError> {
    Ok(Json(app.use_cases.reading.restart.execute(session)?))
}

async fn end_reading(
    State(app): State<Arc<App>>,
    Path(session): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.reading.end.execute(session)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    /// Stored story data is unusable.
    Unprocessable(String),
    BadGateway(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Sign in required").into_response()
            }
            ApiError::Forbidden => {
                (StatusCode::FORBIDDEN, "Only the author can do that").into_response()
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            ApiError::BadGateway(msg) => {
                tracing::warn!(error = %msg, "Upstream failure");
                (StatusCode::BAD_GATEWAY, "Image upload failed").into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::Validation(_) | DomainError::IndexOutOfRange { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            DomainError::DuplicateId(_) => ApiError::Conflict(e.to_string()),
            DomainError::NotFound { .. } => ApiError::NotFound,
            DomainError::MissingEntryPoint | DomainError::BrokenLink { .. } => {
                ApiError::Unprocessable(e.to_string())
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound,
            RepoError::Serialization(msg) => {
                tracing::warn!(error = %msg, "Stored story failed to decode");
                ApiError::Unprocessable("This story's data is unreadable".to_string())
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthoringError> for ApiError {
    fn from(e: AuthoringError) -> Self {
        match e {
            AuthoringError::StoryNotFound(_) => ApiError::NotFound,
            AuthoringError::Forbidden => ApiError::Forbidden,
            AuthoringError::Domain(e) => e.into(),
            AuthoringError::Repo(e) => e.into(),
        }
    }
}

impl From<LibraryError> for ApiError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::StoryNotFound(_) => ApiError::NotFound,
            LibraryError::Repo(e) => e.into(),
        }
    }
}

impl From<ReadingError> for ApiError {
    fn from(e: ReadingError) -> Self {
        match e {
            ReadingError::StoryNotFound(_) | ReadingError::SessionNotFound(_) => {
                ApiError::NotFound
            }
            ReadingError::Domain(e) => e.into(),
            ReadingError::Repo(e) => e.into(),
        }
    }
}

impl From<AssetError> for ApiError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::Relay(e) => ApiError::BadGateway(e.to_string()),
            e => ApiError::BadRequest(e.to_string()),
        }
    }
}
