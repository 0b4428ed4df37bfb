//! Home timeline, tweet posting and likes
//!
//! Every route here sits behind `require_auth`.

use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::flash::{self, FlashMessage};
use super::forms::{FormErrors, TweetForm};
use super::pages;
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::User;
use crate::error::AppError;

async fn render_home(
    state: &AppState,
    viewer: &User,
    draft: &str,
    errors: &FormErrors,
    flashes: &[FlashMessage],
) -> Result<Html<String>, AppError> {
    let timeline = state.timeline().home_timeline(viewer).await?;
    Ok(Html(pages::home_page(viewer, &timeline, draft, errors, flashes)))
}

/// GET /home
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flashes) = flash::take(jar);
    let page = render_home(&state, &user, "", &FormErrors::new(), &flashes).await?;
    Ok((jar, page))
}

/// POST /tweets
///
/// Invalid text re-renders the home page with the draft and its errors.
pub async fn create_tweet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<TweetForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.check() {
        let page = render_home(&state, &user, &form.text, &errors, &[]).await?;
        return Ok(page.into_response());
    }

    match state.tweets().create(&user, &form.text).await {
        Ok(_) => Ok(Redirect::to("/home").into_response()),
        Err(AppError::Validation(message)) => {
            let mut errors = FormErrors::new();
            errors.add("text", message);
            let page = render_home(&state, &user, &form.text, &errors, &[]).await?;
            Ok(page.into_response())
        }
        Err(error) => Err(error),
    }
}

/// GET /like/{tweet_id}
///
/// Liking twice is a silent no-op.
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tweet_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.tweets().like(&user, &tweet_id).await?;
    Ok(Redirect::to("/home"))
}

/// GET /unlike/{tweet_id}
pub async fn unlike(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tweet_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.tweets().unlike(&user, &tweet_id).await?;
    Ok(Redirect::to("/home"))
}
