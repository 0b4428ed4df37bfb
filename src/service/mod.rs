//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate database operations and emit domain logs/metrics.

mod account;
mod follow;
mod timeline;
mod tweet;

pub use account::{AccountService, ProfileSummary, USERNAME_TAKEN};
pub use follow::{FollowOutcome, FollowService, UnfollowOutcome};
pub use timeline::{HomeTimeline, TimelineService};
pub use tweet::{LikeOutcome, TweetService, UnlikeOutcome};
