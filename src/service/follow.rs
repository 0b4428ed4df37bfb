//! Follow service
//!
//! Handles follow/unfollow between local users.

use std::sync::Arc;

use crate::data::{Database, User};
use crate::error::AppError;

/// Result of a follow request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
    /// Follower and followee are the same user; nothing changed
    SelfFollow,
}

/// Result of an unfollow request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Unfollowed,
    NotFollowing,
    /// Follower and followee are the same user; nothing changed
    SelfUnfollow,
}

/// Follow service
pub struct FollowService {
    db: Arc<Database>,
}

impl FollowService {
    /// Create new follow service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Follow `followee_id` as `follower`
    ///
    /// # Returns
    /// The outcome and the resolved followee
    ///
    /// # Errors
    /// `NotFound` if the followee does not exist
    pub async fn follow(
        &self,
        follower: &User,
        followee_id: &str,
    ) -> Result<(FollowOutcome, User), AppError> {
        let followee = self.db.get_user(followee_id).await?.ok_or(AppError::NotFound)?;

        let outcome = if follower.id == followee.id {
            FollowOutcome::SelfFollow
        } else if self
            .db
            .insert_friendship_if_absent(&follower.id, &followee.id)
            .await?
        {
            FollowOutcome::Followed
        } else {
            FollowOutcome::AlreadyFollowing
        };

        let label = match outcome {
            FollowOutcome::Followed => "changed",
            FollowOutcome::AlreadyFollowing => "noop",
            FollowOutcome::SelfFollow => "rejected",
        };
        crate::metrics::FOLLOW_ACTIONS_TOTAL
            .with_label_values(&["follow", label])
            .inc();
        tracing::info!(
            follower_id = %follower.id,
            followee_id = %followee.id,
            ?outcome,
            "Follow"
        );

        Ok((outcome, followee))
    }

    /// Stop following `followee_id`
    ///
    /// # Errors
    /// `NotFound` if the followee does not exist
    pub async fn unfollow(
        &self,
        follower: &User,
        followee_id: &str,
    ) -> Result<(UnfollowOutcome, User), AppError> {
        let followee = self.db.get_user(followee_id).await?.ok_or(AppError::NotFound)?;

        let outcome = if follower.id == followee.id {
            UnfollowOutcome::SelfUnfollow
        } else if self.db.delete_friendship(&follower.id, &followee.id).await? {
            UnfollowOutcome::Unfollowed
        } else {
            UnfollowOutcome::NotFollowing
        };

        let label = match outcome {
            UnfollowOutcome::Unfollowed => "changed",
            UnfollowOutcome::NotFollowing => "noop",
            UnfollowOutcome::SelfUnfollow => "rejected",
        };
        crate::metrics::FOLLOW_ACTIONS_TOTAL
            .with_label_values(&["unfollow", label])
            .inc();
        tracing::info!(
            follower_id = %follower.id,
            followee_id = %followee.id,
            ?outcome,
            "Unfollow"
        );

        Ok((outcome, followee))
    }
}
