//! E2E tests for the home timeline, tweets and likes

mod common;

use common::{TestServer, location};

#[tokio::test]
async fn test_post_tweet_appears_on_home_with_zero_likes() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);

    let response = server
        .post_form("/tweets", Some(&cookie), &[("text", "hello world")])
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/home");

    let home = server.get("/home", Some(&cookie)).await;
    assert_eq!(home.status(), 200);
    let body = home.text().await.unwrap();
    assert!(body.contains("hello world"));
    assert!(body.contains("0 likes"));

    let tweets = server.state.db.get_all_tweets().await.unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].user_id, alice.id);
    assert_eq!(tweets[0].like_count, 0);
}

#[tokio::test]
async fn test_overlong_tweet_is_rejected_not_truncated() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);
    let text = "y".repeat(201);

    let response = server
        .post_form("/tweets", Some(&cookie), &[("text", &text)])
        .await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Ensure this value has at most 200 characters (it has 201)."));
    assert!(server.state.db.get_all_tweets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tweet_text_is_stored_trimmed() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);
    let text = format!("  {}\n", "z".repeat(200));

    let response = server
        .post_form("/tweets", Some(&cookie), &[("text", &text)])
        .await;
    assert_eq!(response.status(), 303);

    let tweets = server.state.db.get_all_tweets().await.unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].text, "z".repeat(200));
}

#[tokio::test]
async fn test_empty_tweet_is_rejected() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);

    let response = server
        .post_form("/tweets", Some(&cookie), &[("text", "")])
        .await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("This field is required."));
    assert!(server.state.db.get_all_tweets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_like_unlike_scenario() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let bob = server.create_user("bob").await;
    let alice_cookie = server.session_cookie(&alice);
    let bob_cookie = server.session_cookie(&bob);

    server
        .post_form("/tweets", Some(&alice_cookie), &[("text", "like me")])
        .await;
    let tweet_id = server.state.db.get_all_tweets().await.unwrap()[0].id.clone();

    let response = server
        .get(&format!("/like/{}", tweet_id), Some(&bob_cookie))
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/home");

    let tweet = server.state.db.get_tweet(&tweet_id).await.unwrap().unwrap();
    assert_eq!(tweet.like_count, 1);
    assert!(server.state.db.has_liked(&bob.id, &tweet_id).await.unwrap());

    let body = server.get("/home", Some(&bob_cookie)).await.text().await.unwrap();
    assert!(body.contains(&format!("href=\"/unlike/{}\"", tweet_id)));
    assert!(body.contains("1 likes"));

    // Second like is a no-op
    server
        .get(&format!("/like/{}", tweet_id), Some(&bob_cookie))
        .await;
    let tweet = server.state.db.get_tweet(&tweet_id).await.unwrap().unwrap();
    assert_eq!(tweet.like_count, 1);

    let response = server
        .get(&format!("/unlike/{}", tweet_id), Some(&bob_cookie))
        .await;
    assert_eq!(response.status(), 303);

    let tweet = server.state.db.get_tweet(&tweet_id).await.unwrap().unwrap();
    assert_eq!(tweet.like_count, 0);
    assert!(!server.state.db.has_liked(&bob.id, &tweet_id).await.unwrap());

    let body = server.get("/home", Some(&bob_cookie)).await.text().await.unwrap();
    assert!(body.contains(&format!("href=\"/like/{}\"", tweet_id)));

    // Unlike without a like is a no-op
    server
        .get(&format!("/unlike/{}", tweet_id), Some(&bob_cookie))
        .await;
    let tweet = server.state.db.get_tweet(&tweet_id).await.unwrap().unwrap();
    assert_eq!(tweet.like_count, 0);
}

#[tokio::test]
async fn test_like_missing_tweet_is_404() {
    let server = TestServer::new().await;
    let alice = server.create_user("alice").await;
    let cookie = server.session_cookie(&alice);

    let response = server.get("/like/no-such-tweet", Some(&cookie)).await;
    assert_eq!(response.status(), 404);

    let response = server.get("/unlike/no-such-tweet", Some(&cookie)).await;
    assert_eq!(response.status(), 404);
}
