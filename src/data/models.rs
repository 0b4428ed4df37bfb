//! Data models
//!
//! Rust structs representing database rows and joined read models.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
///
/// ULIDs sort by creation time at millisecond resolution; list queries
/// order by `rowid` for exact insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

// =============================================================================
// Tweet
// =============================================================================

/// Maximum tweet length in characters
pub const TWEET_MAX_CHARS: usize = 200;

/// A short text post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tweet {
    pub id: String,
    /// Author
    pub user_id: String,
    pub text: String,
    /// Cached number of `likes` rows for this tweet
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Tweet joined with its author's username, for rendering
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TweetWithAuthor {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Like
// =============================================================================

/// "This user liked this tweet"
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub tweet_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Follow relationships
// =============================================================================

/// Directed follow relationship (follower -> followee)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FriendShip {
    pub id: String,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}

/// Lightweight user reference used in follower/followee listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}
