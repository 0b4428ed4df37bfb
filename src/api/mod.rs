//! Web layer
//!
//! HTML handlers for:
//! - Home timeline, tweets and likes
//! - Profiles and follows
//! - Metrics (Prometheus)
//!
//! Signup and login live in `crate::auth`.

pub mod flash;
pub mod forms;
pub mod metrics;
pub mod pages;
mod profile;
mod timeline;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::AppState;
use crate::auth::require_auth;

pub use metrics::metrics_router;

/// Create the timeline/profile router
///
/// Routes:
/// - GET /home, POST /tweets - Timeline and composer (auth)
/// - GET /like/:tweet_id, GET /unlike/:tweet_id - Like toggles (auth)
/// - GET /follow/:user_id, GET /unfollow/:user_id - Follow toggles (auth)
/// - GET /profile/:user_id - Public profile
pub fn web_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/home", get(timeline::home))
        .route("/tweets", post(timeline::create_tweet))
        .route("/like/:tweet_id", get(timeline::like))
        .route("/unlike/:tweet_id", get(timeline::unlike))
        .route("/follow/:user_id", get(profile::follow))
        .route("/unfollow/:user_id", get(profile::unfollow))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/profile/:user_id", get(profile::profile))
        .merge(protected)
}
