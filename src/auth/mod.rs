//! Username/password authentication
//!
//! Handles:
//! - Signup, login and logout pages
//! - Password hashing
//! - Signed session cookies
//! - Authentication middleware

mod login;
mod middleware;
pub mod password;
pub mod session;

pub use login::auth_router;
pub use middleware::{CurrentUser, MaybeUser, current_user, require_auth};
pub use session::{Session, create_session_token, verify_session_token};
