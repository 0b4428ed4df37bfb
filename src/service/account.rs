//! Account service
//!
//! Handles signup, credential checks and profile statistics.

use std::sync::Arc;

use crate::auth::password;
use crate::data::{Database, EntityId, TweetWithAuthor, User, UserSummary};
use crate::error::AppError;

/// Message shown when a signup collides with an existing username
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Everything the profile page shows about one user
#[derive(Debug, Clone)]
pub struct ProfileSummary {
    pub user: User,
    /// Rows where this user is the followee
    pub follower_count: i64,
    /// Rows where this user is the follower
    pub followee_count: i64,
    pub followers: Vec<UserSummary>,
    pub followees: Vec<UserSummary>,
    pub tweets: Vec<TweetWithAuthor>,
    /// Whether the viewer follows this user.
    /// `None` for anonymous viewers and for the user's own profile.
    pub connected: Option<bool>,
}

/// Account service
pub struct AccountService {
    db: Arc<Database>,
}

impl AccountService {
    /// Create new account service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get a user by ID
    ///
    /// # Errors
    /// `NotFound` if no such user exists
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.db.get_user(id).await?.ok_or(AppError::NotFound)
    }

    /// Create a new account
    ///
    /// Input is expected to be validated by the signup form already;
    /// this only enforces uniqueness.
    ///
    /// # Errors
    /// `Validation` if the username is taken
    pub async fn signup(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self.db.get_user_by_username(username).await?.is_some() {
            return Err(AppError::Validation(USERNAME_TAKEN.to_string()));
        }

        let password_hash = password::hash_password_blocking(password.to_string()).await?;
        let now = chrono::Utc::now();
        let user = User {
            id: EntityId::new().0,
            username: username.to_string(),
            password_hash,
            date_joined: now,
            last_login: Some(now),
        };

        // The unique index settles races between concurrent signups.
        if !self.db.insert_user(&user).await? {
            return Err(AppError::Validation(USERNAME_TAKEN.to_string()));
        }

        crate::metrics::USERS_CREATED_TOTAL.inc();
        tracing::info!(user_id = %user.id, username = %user.username, "Account created");

        Ok(user)
    }

    /// Check a username/password pair
    ///
    /// # Returns
    /// The user with `last_login` refreshed, or `None` on bad credentials
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(mut user) = self.db.get_user_by_username(username).await? else {
            crate::metrics::LOGINS_TOTAL
                .with_label_values(&["unknown_user"])
                .inc();
            return Ok(None);
        };

        let verified =
            password::verify_password_blocking(password.to_string(), user.password_hash.clone())
                .await;
        if !verified {
            crate::metrics::LOGINS_TOTAL
                .with_label_values(&["bad_password"])
                .inc();
            tracing::info!(username = %username, "Login rejected");
            return Ok(None);
        }

        let now = chrono::Utc::now();
        self.db.update_last_login(&user.id, now).await?;
        user.last_login = Some(now);

        crate::metrics::LOGINS_TOTAL.with_label_values(&["ok"]).inc();
        tracing::info!(user_id = %user.id, username = %user.username, "Logged in");

        Ok(Some(user))
    }

    /// Build the profile page data for `user_id`
    ///
    /// # Arguments
    /// * `user_id` - Profile subject
    /// * `viewer` - Logged-in user looking at the page, if any
    pub async fn profile(
        &self,
        user_id: &str,
        viewer: Option<&User>,
    ) -> Result<ProfileSummary, AppError> {
        let user = self.get_user(user_id).await?;

        let follower_count = self.db.count_followers(&user.id).await?;
        let followee_count = self.db.count_followees(&user.id).await?;
        let followers = self.db.get_followers(&user.id).await?;
        let followees = self.db.get_followees(&user.id).await?;
        let tweets = self.db.get_tweets_by_user(&user.id).await?;

        let connected = match viewer {
            Some(viewer) if viewer.id != user.id => {
                Some(self.db.is_following(&viewer.id, &user.id).await?)
            }
            _ => None,
        };

        Ok(ProfileSummary {
            user,
            follower_count,
            followee_count,
            followers,
            followees,
            tweets,
            connected,
        })
    }
}
