//! HTML page rendering
//!
//! Pages are plain strings assembled with `format!`. Every piece of user
//! content goes through `html_escape` before it is interpolated.

use axum::http::StatusCode;

use super::flash::FlashMessage;
use super::forms::{FormErrors, SignupForm};
use crate::data::{TweetWithAuthor, User, UserSummary};
use crate::service::{HomeTimeline, ProfileSummary};

fn text(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(value)
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn render_hidden_input(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\" />",
        attr(name),
        attr(value)
    )
}

fn render_errors(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>", text(message)))
        .collect();
    format!("<ul class=\"errorlist\">{}</ul>", items)
}

fn render_flashes(flashes: &[FlashMessage]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let items: String = flashes
        .iter()
        .map(|flash| {
            format!(
                "<li class=\"{}\">{}</li>",
                flash.level.as_str(),
                text(&flash.text)
            )
        })
        .collect();
    format!("<ul class=\"messages\">{}</ul>", items)
}

fn render_nav(viewer: Option<&User>) -> String {
    match viewer {
        Some(user) => format!(
            r#"<nav>
    <a href="/home">Home</a>
    <a href="/profile/{}">{}</a>
    <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>
  </nav>"#,
            attr(&user.id),
            text(&user.username)
        ),
        None => r#"<nav>
    <a href="/signup">Sign up</a>
    <a href="/login">Log in</a>
  </nav>"#
            .to_string(),
    }
}

/// Wrap page content in the shared document shell
pub fn layout(title: &str, viewer: Option<&User>, flashes: &[FlashMessage], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{} - Minitter</title>
</head>
<body>
  {}
  {}
  <main>
{}
  </main>
</body>
</html>"#,
        text(title),
        render_nav(viewer),
        render_flashes(flashes),
        body
    )
}

/// Minimal page for error responses
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/home\">Back to home</a></p>",
        status.as_u16(),
        text(title),
        text(message)
    );
    layout(title, None, &[], &body)
}

// =============================================================================
// Signup / login
// =============================================================================

/// Signup form, optionally with the previous input and its errors
pub fn signup_page(form: &SignupForm, errors: &FormErrors, flashes: &[FlashMessage]) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
{}
<form method="post" action="/signup/confirm">
  <p><label for="id_username">Username</label>
  <input type="text" id="id_username" name="username" maxlength="150" value="{}" required /></p>
  {}
  <p><label for="id_password1">Password</label>
  <input type="password" id="id_password1" name="password1" required /></p>
  {}
  <p><label for="id_password2">Password confirmation</label>
  <input type="password" id="id_password2" name="password2" required /></p>
  {}
  <button type="submit">Confirm</button>
</form>
<p>Already have an account? <a href="/login">Log in</a></p>"#,
        render_errors(errors.non_field()),
        attr(&form.username),
        render_errors(errors.get("username")),
        render_errors(errors.get("password1")),
        render_errors(errors.get("password2")),
    );
    layout("Sign up", None, flashes, &body)
}

/// Second signup step: show the username and resubmit everything
pub fn signup_confirm_page(form: &SignupForm) -> String {
    let hidden = [
        render_hidden_input("username", &form.username),
        render_hidden_input("password1", &form.password1),
        render_hidden_input("password2", &form.password2),
    ]
    .join("\n  ");

    let body = format!(
        r#"<h1>Confirm your account</h1>
<p>Username: <strong>{}</strong></p>
<form method="post" action="/signup">
  {}
  <button type="submit">Create account</button>
</form>
<p><a href="/signup">Start over</a></p>"#,
        text(&form.username),
        hidden
    );
    layout("Confirm sign up", None, &[], &body)
}

pub fn login_page(
    username: &str,
    next: Option<&str>,
    errors: &FormErrors,
    flashes: &[FlashMessage],
) -> String {
    let next_input = next
        .map(|value| render_hidden_input("next", value))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Log in</h1>
{}
<form method="post" action="/login">
  <p><label for="id_username">Username</label>
  <input type="text" id="id_username" name="username" value="{}" required /></p>
  <p><label for="id_password">Password</label>
  <input type="password" id="id_password" name="password" required /></p>
  {}
  <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a></p>"#,
        render_errors(errors.non_field()),
        attr(username),
        next_input
    );
    layout("Log in", None, flashes, &body)
}

// =============================================================================
// Timeline / profile
// =============================================================================

fn render_tweet(tweet: &TweetWithAuthor, like_control: &str) -> String {
    format!(
        r#"<article class="tweet" id="tweet-{}">
  <header><a href="/profile/{}">{}</a> <time datetime="{}">{}</time></header>
  <p>{}</p>
  <footer><span class="like-count">{} likes</span> {}</footer>
</article>"#,
        attr(&tweet.id),
        attr(&tweet.user_id),
        text(&tweet.username),
        tweet.created_at.to_rfc3339(),
        tweet.created_at.format("%Y-%m-%d %H:%M"),
        text(&tweet.text),
        tweet.like_count,
        like_control
    )
}

/// Home page: composer plus every tweet with like controls
pub fn home_page(
    viewer: &User,
    timeline: &HomeTimeline,
    draft: &str,
    errors: &FormErrors,
    flashes: &[FlashMessage],
) -> String {
    let tweets: String = if timeline.tweets.is_empty() {
        "<p>No tweets yet.</p>".to_string()
    } else {
        timeline
            .tweets
            .iter()
            .map(|tweet| {
                let control = if timeline.is_liked(&tweet.id) {
                    format!("<a href=\"/unlike/{}\">Unlike</a>", attr(&tweet.id))
                } else {
                    format!("<a href=\"/like/{}\">Like</a>", attr(&tweet.id))
                };
                render_tweet(tweet, &control)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<h1>Home</h1>
<form method="post" action="/tweets">
  <p><textarea name="text" maxlength="200" rows="3" cols="60" placeholder="What's happening?">{}</textarea></p>
  {}
  <button type="submit">Tweet</button>
</form>
<section class="timeline">
{}
</section>"#,
        text(draft),
        render_errors(errors.get("text")),
        tweets
    );
    layout("Home", Some(viewer), flashes, &body)
}

fn render_user_list(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "<p>None</p>".to_string();
    }
    let items: String = users
        .iter()
        .map(|user| {
            format!(
                "<li><a href=\"/profile/{}\">{}</a></li>",
                attr(&user.id),
                text(&user.username)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

/// Profile page with follow counts and, for other users, a follow toggle
pub fn profile_page(
    viewer: Option<&User>,
    profile: &ProfileSummary,
    flashes: &[FlashMessage],
) -> String {
    let user = &profile.user;
    let follow_control = match profile.connected {
        Some(true) => format!(
            "<p><a class=\"button\" href=\"/unfollow/{}\">Unfollow</a></p>",
            attr(&user.id)
        ),
        Some(false) => format!(
            "<p><a class=\"button\" href=\"/follow/{}\">Follow</a></p>",
            attr(&user.id)
        ),
        None => String::new(),
    };

    let tweets = if profile.tweets.is_empty() {
        "<p>No tweets yet.</p>".to_string()
    } else {
        profile
            .tweets
            .iter()
            .map(|tweet| render_tweet(tweet, ""))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<h1>{}</h1>
<p>Joined {}</p>
<p><span class="followers">{} followers</span> <span class="following">{} following</span></p>
{}
<section>
  <h2>Followers</h2>
  {}
  <h2>Following</h2>
  {}
</section>
<section class="tweets">
  <h2>Tweets</h2>
{}
</section>"#,
        text(&user.username),
        user.date_joined.format("%Y-%m-%d"),
        profile.follower_count,
        profile.followee_count,
        follow_control,
        render_user_list(&profile.followers),
        render_user_list(&profile.followees),
        tweets
    );
    layout(&user.username, viewer, flashes, &body)
}
