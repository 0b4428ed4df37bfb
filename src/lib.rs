//! Minitter - a minimal microblogging web application
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Web Layer (Axum)                         │
//! │  - Signup / login / logout                                  │
//! │  - Home timeline, likes                                     │
//! │  - Profiles, follows                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Accounts, tweets, timeline, follows                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTML handlers, forms, pages and flash messages
//! - `auth`: Password login, signed session cookies, middleware
//! - `service`: Business logic layer
//! - `data`: Database layer
//! - `config`: Configuration management
//! - `metrics`: Prometheus counters
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

/// Largest accepted request body; forms here are tiny
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers
///
/// Cloned for each request; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,
}

impl AppState {
    /// Initialize application state
    ///
    /// Connects to SQLite and applies pending migrations.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or migrated
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = data::Database::connect(&config.database.path).await?;
        let users = db.count_users().await?;
        tracing::info!(users, "Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
        })
    }

    pub fn accounts(&self) -> service::AccountService {
        service::AccountService::new(self.db.clone())
    }

    pub fn tweets(&self) -> service::TweetService {
        service::TweetService::new(self.db.clone())
    }

    pub fn timeline(&self) -> service::TimelineService {
        service::TimelineService::new(self.db.clone())
    }

    pub fn follows(&self) -> service::FollowService {
        service::FollowService::new(self.db.clone())
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{
        compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::web_router(state.clone()))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(api::metrics_router())
}

async fn health_check() -> &'static str {
    "OK"
}
