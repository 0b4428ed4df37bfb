//! Profile pages and follow/unfollow
//!
//! Profiles are public; following requires a logged-in user.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;

use super::flash::{self, FlashMessage};
use super::pages;
use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::service::{FollowOutcome, UnfollowOutcome};

fn profile_location(user_id: &str) -> String {
    format!("/profile/{}", urlencoding::encode(user_id))
}

/// GET /profile/{user_id}
pub async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.accounts().profile(&user_id, viewer.as_ref()).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Html(pages::profile_page(viewer.as_ref(), &summary, &flashes)),
    ))
}

/// GET /follow/{user_id}
pub async fn follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (outcome, followee) = state.follows().follow(&user, &user_id).await?;

    let message = match outcome {
        FollowOutcome::Followed => {
            FlashMessage::success(format!("You are now following {}.", followee.username))
        }
        FollowOutcome::AlreadyFollowing => {
            FlashMessage::warning(format!("You are already following {}.", followee.username))
        }
        FollowOutcome::SelfFollow => FlashMessage::warning("You cannot follow yourself."),
    };

    Ok((
        flash::push(jar, message),
        Redirect::to(&profile_location(&followee.id)),
    ))
}

/// GET /unfollow/{user_id}
pub async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (outcome, followee) = state.follows().unfollow(&user, &user_id).await?;

    let message = match outcome {
        UnfollowOutcome::Unfollowed => {
            FlashMessage::success(format!("You are no longer following {}.", followee.username))
        }
        UnfollowOutcome::NotFollowing => {
            FlashMessage::warning(format!("You are not following {}.", followee.username))
        }
        UnfollowOutcome::SelfUnfollow => FlashMessage::warning("You cannot unfollow yourself."),
    };

    Ok((
        flash::push(jar, message),
        Redirect::to(&profile_location(&followee.id)),
    ))
}
