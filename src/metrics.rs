//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Domain Metrics
    pub static ref USERS_CREATED_TOTAL: IntCounter = IntCounter::new(
        "minitter_users_created_total",
        "Total number of accounts created"
    ).expect("metric can be created");
    pub static ref LOGINS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("minitter_logins_total", "Total number of login attempts"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref TWEETS_CREATED_TOTAL: IntCounter = IntCounter::new(
        "minitter_tweets_created_total",
        "Total number of tweets posted"
    ).expect("metric can be created");
    pub static ref LIKE_ACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("minitter_like_actions_total", "Total number of like/unlike requests"),
        &["action", "outcome"]
    ).expect("metric can be created");
    pub static ref FOLLOW_ACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("minitter_follow_actions_total", "Total number of follow/unfollow requests"),
        &["action", "outcome"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("minitter_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Registering twice is harmless: the duplicate registration error is
/// ignored so tests can build several app states in one process.
pub fn init_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(USERS_CREATED_TOTAL.clone()),
        Box::new(LOGINS_TOTAL.clone()),
        Box::new(TWEETS_CREATED_TOTAL.clone()),
        Box::new(LIKE_ACTIONS_TOTAL.clone()),
        Box::new(FOLLOW_ACTIONS_TOTAL.clone()),
        Box::new(ERRORS_TOTAL.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(error) => tracing::warn!(%error, "Failed to register metric"),
        }
    }

    tracing::info!("Metrics registry initialized");
}
