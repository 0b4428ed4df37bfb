//! Authentication middleware
//!
//! Protects routes that require a logged-in user and resolves the
//! current user for handlers that only want to know who is looking.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, Method, Uri, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use super::session::{SESSION_COOKIE, verify_session_token};
use crate::AppState;
use crate::data::User;
use crate::error::AppError;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Resolve the user behind the session cookie, if any
///
/// Invalid or expired tokens and users deleted since login all count as
/// "not logged in"; only database failures are errors.
pub async fn current_user(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(token) = extract_token_from_headers(headers) else {
        return Ok(None);
    };

    let session = match verify_session_token(&token, &state.config.auth.session_secret) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!(%error, "Ignoring invalid session cookie");
            return Ok(None);
        }
    };

    state.db.get_user(&session.user_id).await
}

/// Rejection for an anonymous request
///
/// Only GET targets are kept as `next`, since login redirects with a GET.
fn login_required(method: &Method, uri: &Uri) -> AppError {
    if method != Method::GET {
        return AppError::Unauthorized;
    }
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    AppError::LoginRequired(next)
}

/// Middleware to require authentication
///
/// Resolves the session cookie and adds the `User` to request extensions.
/// Anonymous requests are redirected to the login page.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/home", ...)
///     .route_layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(request.headers(), &state)
        .await?
        .ok_or_else(|| login_required(request.method(), request.uri()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extractor for current authenticated user
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(CurrentUser(user));
        }

        let state = AppState::from_ref(state);
        let user = current_user(&parts.headers, &state)
            .await?
            .ok_or_else(|| login_required(&parts.method, &parts.uri))?;
        parts.extensions.insert(user.clone());

        Ok(CurrentUser(user))
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of redirecting.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(MaybeUser(Some(user)));
        }

        let state = AppState::from_ref(state);
        let user = current_user(&parts.headers, &state).await?;
        if let Some(user) = &user {
            parts.extensions.insert(user.clone());
        }

        Ok(MaybeUser(user))
    }
}
