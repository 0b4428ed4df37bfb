//! E2E tests for profiles and follow/unfollow

mod common;

use common::{TestServer, location};

#[tokio::test]
async fn test_follow_then_unfollow_restores_friendships() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let bob = server.create_user("bob").await;
    let bob_cookie = server.session_cookie(&bob);

    let response = server
        .get(&format!("/follow/{}", alice.id), Some(&bob_cookie))
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), format!("/profile/{}", alice.id));
    assert!(server.state.db.is_following(&bob.id, &alice.id).await.unwrap());

    let page = server.follow_redirect(&response, &bob_cookie).await;
    let body = page.text().await.unwrap();
    assert!(body.contains("You are now following alice."));
    assert!(body.contains("1 followers"));
    assert!(body.contains(&format!("href=\"/unfollow/{}\"", alice.id)));

    let response = server
        .get(&format!("/unfollow/{}", alice.id), Some(&bob_cookie))
        .await;
    assert_eq!(response.status(), 303);
    let body = server
        .follow_redirect(&response, &bob_cookie)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("You are no longer following alice."));
    assert!(body.contains(&format!("href=\"/follow/{}\"", alice.id)));

    assert_eq!(server.state.db.count_friendships().await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_twice_warns() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let bob = server.create_user("bob").await;
    let bob_cookie = server.session_cookie(&bob);

    server
        .get(&format!("/follow/{}", alice.id), Some(&bob_cookie))
        .await;
    let response = server
        .get(&format!("/follow/{}", alice.id), Some(&bob_cookie))
        .await;
    let body = server
        .follow_redirect(&response, &bob_cookie)
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("You are already following alice."));
    assert_eq!(server.state.db.count_friendships().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unfollow_when_not_following_warns() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let bob = server.create_user("bob").await;
    let bob_cookie = server.session_cookie(&bob);

    let response = server
        .get(&format!("/unfollow/{}", alice.id), Some(&bob_cookie))
        .await;
    assert_eq!(response.status(), 303);
    let body = server
        .follow_redirect(&response, &bob_cookie)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("You are not following alice."));
}

#[tokio::test]
async fn test_self_follow_and_unfollow_change_nothing() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);

    let response = server
        .get(&format!("/follow/{}", alice.id), Some(&cookie))
        .await;
    assert_eq!(location(&response), format!("/profile/{}", alice.id));
    let body = server
        .follow_redirect(&response, &cookie)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("You cannot follow yourself."));

    let response = server
        .get(&format!("/unfollow/{}", alice.id), Some(&cookie))
        .await;
    let body = server
        .follow_redirect(&response, &cookie)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("You cannot unfollow yourself."));

    assert_eq!(server.state.db.count_friendships().await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_missing_user_is_404() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);

    let response = server.get("/follow/nobody", Some(&cookie)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_profile_is_public_and_lists_tweets() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);
    server
        .post_form("/tweets", Some(&cookie), &[("text", "on my profile")])
        .await;

    let response = server.get(&format!("/profile/{}", alice.id), None).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("alice"));
    assert!(body.contains("on my profile"));
    assert!(body.contains("0 followers"));
    assert!(!body.contains("/follow/"));

    // Own profile shows no follow control either
    let body = server
        .get(&format!("/profile/{}", alice.id), Some(&cookie))
        .await
        .text()
        .await
        .unwrap();
    assert!(!body.contains(&format!("/follow/{}", alice.id)));
}
