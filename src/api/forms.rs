//! Form payloads and validation
//!
//! Field rules mirror the usual web-framework defaults for user creation
//! and short text posts. Errors are collected per field so pages can show
//! them inline.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::data::TWEET_MAX_CHARS;

const USERNAME_MAX_CHARS: usize = 150;
const PASSWORD_MIN_CHARS: usize = 8;

/// Key for errors not tied to a single field
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(&field.to_string(), message);
            }
        }
        form_errors
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(invalid("required", "This field is required.".to_string()));
    }

    let length = username.chars().count();
    if length > USERNAME_MAX_CHARS {
        return Err(invalid(
            "max_length",
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                USERNAME_MAX_CHARS, length
            ),
        ));
    }

    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(invalid(
            "invalid",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid("required", "This field is required.".to_string()));
    }

    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(invalid(
            "password_too_short",
            format!(
                "This password is too short. It must contain at least {} characters.",
                PASSWORD_MIN_CHARS
            ),
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "password_entirely_numeric",
            "This password is entirely numeric.".to_string(),
        ));
    }

    Ok(())
}

fn validate_tweet_text(text: &str) -> Result<(), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("required", "This field is required.".to_string()));
    }

    let length = text.chars().count();
    if length > TWEET_MAX_CHARS {
        return Err(invalid(
            "max_length",
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                TWEET_MAX_CHARS, length
            ),
        ));
    }

    Ok(())
}

// =============================================================================
// Signup
// =============================================================================

/// Username plus password typed twice
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "validate_new_password"))]
    pub password1: String,
    #[serde(default)]
    #[validate(must_match(
        other = "password1",
        message = "The two password fields didn't match."
    ))]
    pub password2: String,
}

impl SignupForm {
    /// Run every field rule plus the cross-field checks
    pub fn check(&self) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(errors) => FormErrors::from(errors),
        };

        if !self.username.is_empty()
            && self.password1.eq_ignore_ascii_case(&self.username)
            && errors.get("password1").is_empty()
        {
            errors.add("password1", "The password is too similar to the username.");
        }

        errors.into_result()
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login credentials and the page to return to
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Query string of `GET /login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Accept only local absolute paths as post-login targets
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/home",
    }
}

// =============================================================================
// Tweet
// =============================================================================

/// Tweet composer
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TweetForm {
    #[serde(default)]
    #[validate(custom(function = "validate_tweet_text"))]
    pub text: String,
}

impl TweetForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }
}
