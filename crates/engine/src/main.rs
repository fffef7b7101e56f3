//! Branchtale Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use branchtale_engine::api::{self, identity::USER_ID_HEADER};
use branchtale_engine::infrastructure::{
    clock::SystemClock, imgur::ImgurClient, persistence::SqliteStoryRepo,
};
use branchtale_engine::{App, EngineConfig};

const READING_SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is often run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "branchtale_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Branchtale Engine");

    let config = EngineConfig::from_env();

    let stories = Arc::new(SqliteStoryRepo::new(&config.story_db).await?);
    tracing::info!(path = %config.story_db, "Story database ready");

    if config.imgur_client_id.is_none() {
        tracing::warn!("IMGUR_CLIENT_ID is not set; cover uploads will fail");
    }
    let image_host = Arc::new(ImgurClient::new(
        &config.imgur_api_url,
        config.imgur_client_id.clone(),
    ));

    let app = Arc::new(App::new(
        stories,
        image_host,
        Arc::new(SystemClock::new()),
        config.max_upload_bytes,
        chrono::Duration::seconds(config.reading_session_ttl_secs),
    ));

    // Sweep abandoned reading sessions
    let sweep_sessions = app.stores.reading_sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(READING_SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sweep_sessions.cleanup_expired();
            if removed > 0 {
                tracing::debug!(removed, "Expired idle reading sessions");
            }
        }
    });

    let mut router = api::http::routes(config.max_upload_bytes)
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // The web client sends X-User-Id and JSON bodies, which trigger preflights.
        .allow_headers([
            HeaderName::from_static(USER_ID_HEADER),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
