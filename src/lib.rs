pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod models;
pub mod resolver;
pub mod service;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::{Database, MemoryStore, Store};
use crate::service::BoardService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BoardService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            service: BoardService::new(store, config.auth.clone()),
            config: Arc::new(config),
        }
    }
}

/// Open the configured store: PostgreSQL when a URL is set, memory otherwise
async fn connect_store(config: &Config) -> Result<Arc<dyn Store>> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::warn!("DATABASE_URL not set - using in-memory store, data will not persist");
        return Ok(Arc::new(MemoryStore::new()));
    };

    // Connect to database with production settings
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(url)
        .await?;

    tracing::info!(
        "Database pool: max={}, min={} connections",
        config.database.max_connections,
        config.database.min_connections
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    Ok(Arc::new(Database::new(pool)))
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let state = AppState::new(store, config);
    let config = state.config.clone();

    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("thumbboard listening on {}", addr);
    tracing::info!(
        "Max body size: {} bytes, session ttl: {}h",
        config.server.max_body_size,
        config.auth.session_ttl_hours
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Assemble the full application: API routes, probes, static bundle and layers
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = build_cors_layer(&config.security.cors_origins);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .merge(api::router());

    let static_dir = Path::new(&config.server.static_dir);
    if static_dir.is_dir() {
        tracing::info!("Serving static files from {}", static_dir.display());
        app = app
            .route_service("/", ServeFile::new(static_dir.join("index.html")))
            .fallback_service(ServeDir::new(static_dir));
    }

    // Middleware layers (order matters - applied bottom to top)
    app.layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https://img.youtube.com; connect-src 'self'"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Readiness check - verifies store connectivity
async fn ready_check(
    State(state): State<AppState>,
) -> std::result::Result<&'static str, (StatusCode, &'static str)> {
    match state.service.store().ping().await {
        Ok(()) => Ok("ready"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            Err((StatusCode::SERVICE_UNAVAILABLE, "database unavailable"))
        }
    }
}

/// Build CORS layer from configuration
fn build_cors_layer(origins: &str) -> CorsLayer {
    if origins == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;

        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
