//! Timeline service
//!
//! Assembles the home timeline.

use std::collections::HashSet;
use std::sync::Arc;

use crate::data::{Database, TweetWithAuthor, User};
use crate::error::AppError;

/// Home timeline contents for one viewer
#[derive(Debug, Clone)]
pub struct HomeTimeline {
    /// Every tweet, in insertion order
    pub tweets: Vec<TweetWithAuthor>,
    /// IDs of the tweets the viewer has liked
    pub liked_tweet_ids: HashSet<String>,
}

impl HomeTimeline {
    pub fn is_liked(&self, tweet_id: &str) -> bool {
        self.liked_tweet_ids.contains(tweet_id)
    }
}

/// Timeline service
pub struct TimelineService {
    db: Arc<Database>,
}

impl TimelineService {
    /// Create new timeline service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get home timeline
    ///
    /// Returns all tweets (no pagination) together with the set of tweet
    /// IDs `viewer` has liked, so the page can render like/unlike state.
    pub async fn home_timeline(&self, viewer: &User) -> Result<HomeTimeline, AppError> {
        let tweets = self.db.get_all_tweets().await?;
        let liked_tweet_ids = self.db.get_liked_tweet_ids(&viewer.id).await?;

        Ok(HomeTimeline {
            tweets,
            liked_tweet_ids,
        })
    }
}
