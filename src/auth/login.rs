//! Signup, login and logout
//!
//! Signup is two steps: the form posts to `/signup/confirm`, which shows
//! the chosen username, and the confirmation posts to `/signup`, which
//! creates the account and logs the new user in.

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;

use super::session::{Session, build_session_cookie, clear_session_cookie, create_session_token};
use crate::AppState;
use crate::api::flash::{self, FlashMessage};
use crate::api::forms::{
    FormErrors, LoginForm, LoginQuery, NON_FIELD_ERRORS, SignupForm, safe_next,
};
use crate::api::pages;
use crate::data::User;
use crate::error::AppError;
use crate::service::USERNAME_TAKEN;

const BAD_CREDENTIALS: &str = "Please enter a correct username and password. \
Note that both fields may be case-sensitive.";

/// Create authentication router
///
/// Routes:
/// - GET / and GET /signup - Signup form
/// - POST /signup/confirm - Validate and ask for confirmation
/// - POST /signup - Create the account and log in
/// - GET /login, POST /login - Password login
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/", get(signup_form))
        .route("/signup", get(signup_form).post(signup))
        .route("/signup/confirm", post(signup_confirm))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
}

/// Add a fresh session cookie for `user`
fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar, AppError> {
    let session = Session::for_user(user, state.config.auth.session_max_age)?;
    let token = create_session_token(&session, &state.config.auth.session_secret)?;
    let cookie = build_session_cookie(token, state.config.should_use_secure_cookies());
    Ok(jar.add(cookie))
}

// =============================================================================
// Signup
// =============================================================================

/// GET /signup
async fn signup_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(pages::signup_page(
            &SignupForm::default(),
            &FormErrors::new(),
            &flashes,
        )),
    )
}

/// POST /signup/confirm
///
/// Re-renders the form with errors, or shows the confirmation step.
async fn signup_confirm(Form(form): Form<SignupForm>) -> Html<String> {
    match form.check() {
        Ok(()) => Html(pages::signup_confirm_page(&form)),
        Err(errors) => Html(pages::signup_page(&form, &errors, &[])),
    }
}

/// POST /signup
///
/// Validates again, since the confirmation form can be replayed with
/// arbitrary values.
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.check() {
        return Ok(Html(pages::signup_page(&form, &errors, &[])).into_response());
    }

    let user = match state.accounts().signup(&form.username, &form.password1).await {
        Ok(user) => user,
        Err(AppError::Validation(message)) if message == USERNAME_TAKEN => {
            let mut errors = FormErrors::new();
            errors.add("username", message);
            return Ok(Html(pages::signup_page(&form, &errors, &[])).into_response());
        }
        Err(error) => return Err(error),
    };

    let jar = start_session(&state, jar, &user)?;
    let jar = flash::push(
        jar,
        FlashMessage::success(format!("Welcome to Minitter, {}!", user.username)),
    );

    Ok((jar, Redirect::to("/home")).into_response())
}

// =============================================================================
// Login / logout
// =============================================================================

/// GET /login
async fn login_form(jar: CookieJar, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(pages::login_page(
            "",
            query.next.as_deref(),
            &FormErrors::new(),
            &flashes,
        )),
    )
}

/// POST /login
///
/// On success redirects to `next` when it is a local path, else `/home`.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = if form.username.is_empty() || form.password.is_empty() {
        None
    } else {
        state
            .accounts()
            .authenticate(&form.username, &form.password)
            .await?
    };

    let Some(user) = user else {
        let mut errors = FormErrors::new();
        errors.add(NON_FIELD_ERRORS, BAD_CREDENTIALS);
        let page = pages::login_page(&form.username, form.next.as_deref(), &errors, &[]);
        return Ok(Html(page).into_response());
    };

    let jar = start_session(&state, jar, &user)?;
    let target = safe_next(form.next.as_deref()).to_string();

    Ok((jar, Redirect::to(&target)).into_response())
}

/// POST /logout
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(clear_session_cookie());
    let jar = flash::push(jar, FlashMessage::info("You have been logged out."));
    (jar, Redirect::to("/login"))
}
