//! SQLite database operations
//!
//! All database access goes through this module.
//! Uses SQLx with runtime-checked queries and embedded migrations.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!(path = %path.display(), "Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user
    ///
    /// # Returns
    /// `false` if the username is already taken
    pub async fn insert_user(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, username, password_hash, date_joined, last_login)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.date_joined)
        .bind(user.last_login)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by exact username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Record a successful login
    pub async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count registered users
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete a user together with everything they own
    ///
    /// Tweets, likes and friendships go by cascade. Tweets by other users
    /// that this user liked lose one from their cached count in the same
    /// transaction.
    ///
    /// # Returns
    /// `false` if no such user existed
    pub async fn delete_user(&self, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE tweets SET like_count = like_count - 1
            WHERE like_count > 0
              AND id IN (SELECT tweet_id FROM likes WHERE user_id = ?)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(deleted.rows_affected() > 0)
    }

    // =========================================================================
    // Tweets
    // =========================================================================

    /// Insert a new tweet
    pub async fn insert_tweet(&self, tweet: &Tweet) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tweets (id, user_id, text, like_count, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&tweet.id)
        .bind(&tweet.user_id)
        .bind(&tweet.text)
        .bind(tweet.like_count)
        .bind(tweet.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get tweet by ID
    pub async fn get_tweet(&self, id: &str) -> Result<Option<Tweet>, AppError> {
        let tweet = sqlx::query_as::<_, Tweet>("SELECT * FROM tweets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tweet)
    }

    /// Get every tweet with its author, in insertion order
    pub async fn get_all_tweets(&self) -> Result<Vec<TweetWithAuthor>, AppError> {
        let tweets = sqlx::query_as::<_, TweetWithAuthor>(
            r#"
            SELECT t.id, t.user_id, u.username, t.text, t.like_count, t.created_at
            FROM tweets t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tweets)
    }

    /// Get tweets written by one user, in insertion order
    pub async fn get_tweets_by_user(&self, user_id: &str) -> Result<Vec<TweetWithAuthor>, AppError> {
        let tweets = sqlx::query_as::<_, TweetWithAuthor>(
            r#"
            SELECT t.id, t.user_id, u.username, t.text, t.like_count, t.created_at
            FROM tweets t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = ?
            ORDER BY t.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tweets)
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Insert a like and bump the tweet's cached count
    ///
    /// Both writes share one transaction. The `(user_id, tweet_id)` unique
    /// index turns a repeated like into a no-op.
    ///
    /// # Returns
    /// `true` if a new like was recorded
    pub async fn insert_like(&self, user_id: &str, tweet_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO likes (id, user_id, tweet_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(EntityId::new().0)
        .bind(user_id)
        .bind(tweet_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE tweets SET like_count = like_count + 1 WHERE id = ?")
            .bind(tweet_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a like and decrement the tweet's cached count
    ///
    /// # Returns
    /// `true` if a like was removed
    pub async fn delete_like(&self, user_id: &str, tweet_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM likes WHERE user_id = ? AND tweet_id = ?")
            .bind(user_id)
            .bind(tweet_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE tweets SET like_count = like_count - 1 WHERE id = ? AND like_count > 0")
            .bind(tweet_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Get the like row for (user, tweet), if any
    pub async fn get_like(&self, user_id: &str, tweet_id: &str) -> Result<Option<Like>, AppError> {
        let like = sqlx::query_as::<_, Like>(
            "SELECT id, user_id, tweet_id, created_at FROM likes WHERE user_id = ? AND tweet_id = ?",
        )
        .bind(user_id)
        .bind(tweet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(like)
    }

    /// Check whether a user liked a tweet
    pub async fn has_liked(&self, user_id: &str, tweet_id: &str) -> Result<bool, AppError> {
        Ok(self.get_like(user_id, tweet_id).await?.is_some())
    }

    /// IDs of every tweet a user has liked
    pub async fn get_liked_tweet_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT tweet_id FROM likes WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// Count like rows for a tweet
    pub async fn count_likes_for_tweet(&self, tweet_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE tweet_id = ?")
            .bind(tweet_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Insert a follow relationship unless it already exists
    ///
    /// # Returns
    /// `true` if a new row was created
    pub async fn insert_friendship_if_absent(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO friendships (id, follower_id, followee_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(EntityId::new().0)
        .bind(follower_id)
        .bind(followee_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(inserted.rows_affected() > 0)
    }

    /// Delete a follow relationship
    ///
    /// # Returns
    /// `true` if a row was removed
    pub async fn delete_friendship(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let deleted =
            sqlx::query("DELETE FROM friendships WHERE follower_id = ? AND followee_id = ?")
                .bind(follower_id)
                .bind(followee_id)
                .execute(&self.pool)
                .await?;

        Ok(deleted.rows_affected() > 0)
    }

    /// Get the follow relationship between two users, if any
    pub async fn get_friendship(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<Option<FriendShip>, AppError> {
        let friendship = sqlx::query_as::<_, FriendShip>(
            r#"
            SELECT id, follower_id, followee_id, created_at
            FROM friendships
            WHERE follower_id = ? AND followee_id = ?
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// Check whether `follower_id` follows `followee_id`
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> Result<bool, AppError> {
        Ok(self.get_friendship(follower_id, followee_id).await?.is_some())
    }

    /// Number of users following `user_id`
    pub async fn count_followers(&self, user_id: &str) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friendships WHERE followee_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Number of users `user_id` follows
    pub async fn count_followees(&self, user_id: &str) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friendships WHERE follower_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Users following `user_id`, oldest relationship first
    pub async fn get_followers(&self, user_id: &str) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username
            FROM friendships f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followee_id = ?
            ORDER BY f.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Users `user_id` follows, oldest relationship first
    pub async fn get_followees(&self, user_id: &str) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username
            FROM friendships f
            JOIN users u ON u.id = f.followee_id
            WHERE f.follower_id = ?
            ORDER BY f.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count every follow relationship
    pub async fn count_friendships(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friendships")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
