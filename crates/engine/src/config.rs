//! Engine configuration from environment variables.

use crate::infrastructure::imgur::DEFAULT_IMGUR_API_URL;
use crate::stores::reading_sessions::DEFAULT_READING_SESSION_TTL_SECS;
use crate::use_cases::assets::DEFAULT_MAX_UPLOAD_BYTES;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// SQLite file holding the `stories` table.
    pub story_db: String,
    /// Without it the server runs but cover uploads fail.
    pub imgur_client_id: Option<String>,
    pub imgur_api_url: String,
    pub max_upload_bytes: usize,
    /// Idle reading sessions are dropped after this many seconds.
    pub reading_session_ttl_secs: i64,
    /// Comma-separated origins or `*`. Unset disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: non_empty("SERVER_PORT")
                .or_else(|| non_empty("PORT"))
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            story_db: non_empty("STORY_DB").unwrap_or_else(|| "stories.db".into()),
            imgur_client_id: non_empty("IMGUR_CLIENT_ID"),
            imgur_api_url: non_empty("IMGUR_API_URL")
                .unwrap_or_else(|| DEFAULT_IMGUR_API_URL.into()),
            max_upload_bytes: non_empty("MAX_UPLOAD_BYTES")
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            reading_session_ttl_secs: non_empty("READING_SESSION_TTL_SECS")
                .and_then(|n| n.parse().ok())
                .filter(|secs: &i64| *secs > 0)
                .unwrap_or(DEFAULT_READING_SESSION_TTL_SECS),
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS"),
        }
    }
}
