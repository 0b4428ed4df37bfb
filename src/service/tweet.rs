//! Tweet service
//!
//! Handles tweet creation and like/unlike toggling.

use std::sync::Arc;

use crate::data::{Database, EntityId, TWEET_MAX_CHARS, Tweet, User};
use crate::error::AppError;

/// Result of a like request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    /// The user had already liked the tweet; nothing changed
    AlreadyLiked,
}

/// Result of an unlike request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlikeOutcome {
    Unliked,
    /// There was no like to remove; nothing changed
    NotLiked,
}

/// Tweet service
pub struct TweetService {
    db: Arc<Database>,
}

impl TweetService {
    /// Create new tweet service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get a tweet by ID
    ///
    /// # Errors
    /// `NotFound` if no such tweet exists
    pub async fn get(&self, id: &str) -> Result<Tweet, AppError> {
        self.db.get_tweet(id).await?.ok_or(AppError::NotFound)
    }

    /// Post a new tweet as `author`
    ///
    /// # Errors
    /// `Validation` if the text is blank or longer than 200 characters.
    /// Overlong text is rejected, never truncated. Surrounding whitespace
    /// is stripped before the length check and is not stored.
    pub async fn create(&self, author: &User, text: &str) -> Result<Tweet, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("This field is required.".to_string()));
        }
        let length = text.chars().count();
        if length > TWEET_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Ensure this value has at most {} characters (it has {}).",
                TWEET_MAX_CHARS, length
            )));
        }

        let tweet = Tweet {
            id: EntityId::new().0,
            user_id: author.id.clone(),
            text: text.to_string(),
            like_count: 0,
            created_at: chrono::Utc::now(),
        };
        self.db.insert_tweet(&tweet).await?;

        crate::metrics::TWEETS_CREATED_TOTAL.inc();
        tracing::info!(tweet_id = %tweet.id, user_id = %author.id, "Tweet created");

        Ok(tweet)
    }

    /// Like a tweet
    ///
    /// Records a like and increments the cached count, unless this user
    /// already liked the tweet.
    ///
    /// # Errors
    /// `NotFound` if the tweet does not exist
    pub async fn like(&self, user: &User, tweet_id: &str) -> Result<LikeOutcome, AppError> {
        let tweet = self.get(tweet_id).await?;

        let outcome = if self.db.insert_like(&user.id, &tweet.id).await? {
            LikeOutcome::Liked
        } else {
            LikeOutcome::AlreadyLiked
        };

        let label = match outcome {
            LikeOutcome::Liked => "changed",
            LikeOutcome::AlreadyLiked => "noop",
        };
        crate::metrics::LIKE_ACTIONS_TOTAL
            .with_label_values(&["like", label])
            .inc();
        tracing::info!(tweet_id = %tweet.id, user_id = %user.id, ?outcome, "Like");

        Ok(outcome)
    }

    /// Remove a like
    ///
    /// # Errors
    /// `NotFound` if the tweet does not exist
    pub async fn unlike(&self, user: &User, tweet_id: &str) -> Result<UnlikeOutcome, AppError> {
        let tweet = self.get(tweet_id).await?;

        let outcome = if self.db.delete_like(&user.id, &tweet.id).await? {
            UnlikeOutcome::Unliked
        } else {
            UnlikeOutcome::NotLiked
        };

        let label = match outcome {
            UnlikeOutcome::Unliked => "changed",
            UnlikeOutcome::NotLiked => "noop",
        };
        crate::metrics::LIKE_ACTIONS_TOTAL
            .with_label_values(&["unlike", label])
            .inc();
        tracing::info!(tweet_id = %tweet.id, user_id = %user.id, ?outcome, "Unlike");

        Ok(outcome)
    }
}
