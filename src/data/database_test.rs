//! Database tests

use super::*;
use chrono::Utc;
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (db, temp_dir)
}

fn new_user(username: &str) -> User {
    User {
        id: EntityId::new().0,
        username: username.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        date_joined: Utc::now(),
        last_login: None,
    }
}

fn new_tweet(author: &User, text: &str) -> Tweet {
    Tweet {
        id: EntityId::new().0,
        user_id: author.id.clone(),
        text: text.to_string(),
        like_count: 0,
        created_at: Utc::now(),
    }
}

async fn insert_users(db: &Database, names: &[&str]) -> Vec<User> {
    let mut users = Vec::new();
    for name in names {
        let user = new_user(name);
        assert!(db.insert_user(&user).await.unwrap());
        users.push(user);
    }
    users
}

#[tokio::test]
async fn test_database_connection() {
    let (db, _temp_dir) = create_test_db().await;
    assert_eq!(db.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_user_insert_and_lookup() {
    let (db, _temp_dir) = create_test_db().await;
    let user = new_user("alice");

    assert!(db.insert_user(&user).await.unwrap());

    let by_id = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, "alice");
    assert_eq!(by_id.password_hash, user.password_hash);
    assert!(by_id.last_login.is_none());

    let by_name = db.get_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, user.id);

    assert!(db.get_user("missing").await.unwrap().is_none());
    assert!(db.get_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_username_is_unique() {
    let (db, _temp_dir) = create_test_db().await;

    assert!(db.insert_user(&new_user("alice")).await.unwrap());
    assert!(!db.insert_user(&new_user("alice")).await.unwrap());
    assert_eq!(db.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_last_login() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice"]).await;

    let at = Utc::now();
    db.update_last_login(&users[0].id, at).await.unwrap();

    let user = db.get_user(&users[0].id).await.unwrap().unwrap();
    let stored = user.last_login.unwrap();
    assert_eq!(stored.timestamp(), at.timestamp());
}

#[tokio::test]
async fn test_tweets_listed_in_insertion_order() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice", "bob"]).await;

    let first = new_tweet(&users[0], "first");
    let second = new_tweet(&users[1], "second");
    let third = new_tweet(&users[0], "third");
    for tweet in [&first, &second, &third] {
        db.insert_tweet(tweet).await.unwrap();
    }

    let all = db.get_all_tweets().await.unwrap();
    let texts: Vec<_> = all.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
    assert_eq!(all[1].username, "bob");

    let alice_tweets = db.get_tweets_by_user(&users[0].id).await.unwrap();
    assert_eq!(alice_tweets.len(), 2);
    assert!(alice_tweets.iter().all(|t| t.user_id == users[0].id));

    let fetched = db.get_tweet(&second.id).await.unwrap().unwrap();
    assert_eq!(fetched.text, "second");
    assert_eq!(fetched.like_count, 0);
}

#[tokio::test]
async fn test_overlong_tweet_rejected_by_schema() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice"]).await;

    let tweet = new_tweet(&users[0], &"x".repeat(201));
    assert!(db.insert_tweet(&tweet).await.is_err());
}

#[tokio::test]
async fn test_like_and_unlike_keep_count_exact() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice", "bob"]).await;
    let tweet = new_tweet(&users[0], "hello");
    db.insert_tweet(&tweet).await.unwrap();

    assert!(db.insert_like(&users[1].id, &tweet.id).await.unwrap());
    assert!(!db.insert_like(&users[1].id, &tweet.id).await.unwrap());
    assert!(db.has_liked(&users[1].id, &tweet.id).await.unwrap());
    assert!(!db.has_liked(&users[0].id, &tweet.id).await.unwrap());

    let like = db.get_like(&users[1].id, &tweet.id).await.unwrap().unwrap();
    assert_eq!(like.user_id, users[1].id);
    assert_eq!(like.tweet_id, tweet.id);

    let stored = db.get_tweet(&tweet.id).await.unwrap().unwrap();
    assert_eq!(stored.like_count, 1);
    assert_eq!(db.count_likes_for_tweet(&tweet.id).await.unwrap(), 1);

    let liked = db.get_liked_tweet_ids(&users[1].id).await.unwrap();
    assert!(liked.contains(&tweet.id));

    assert!(db.delete_like(&users[1].id, &tweet.id).await.unwrap());
    assert!(!db.delete_like(&users[1].id, &tweet.id).await.unwrap());

    let stored = db.get_tweet(&tweet.id).await.unwrap().unwrap();
    assert_eq!(stored.like_count, 0);
    assert_eq!(db.count_likes_for_tweet(&tweet.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_friendships() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice", "bob", "carol"]).await;
    let (alice, bob, carol) = (&users[0], &users[1], &users[2]);

    assert!(db.insert_friendship_if_absent(&bob.id, &alice.id).await.unwrap());
    assert!(!db.insert_friendship_if_absent(&bob.id, &alice.id).await.unwrap());
    assert!(db.insert_friendship_if_absent(&carol.id, &alice.id).await.unwrap());
    assert!(db.insert_friendship_if_absent(&alice.id, &carol.id).await.unwrap());

    assert!(db.is_following(&bob.id, &alice.id).await.unwrap());
    assert!(!db.is_following(&alice.id, &bob.id).await.unwrap());

    let friendship = db.get_friendship(&bob.id, &alice.id).await.unwrap().unwrap();
    assert_eq!(friendship.follower_id, bob.id);
    assert_eq!(friendship.followee_id, alice.id);

    assert_eq!(db.count_followers(&alice.id).await.unwrap(), 2);
    assert_eq!(db.count_followees(&alice.id).await.unwrap(), 1);

    let followers: Vec<_> = db
        .get_followers(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(followers, ["bob", "carol"]);

    let followees = db.get_followees(&alice.id).await.unwrap();
    assert_eq!(
        followees,
        vec![UserSummary {
            id: carol.id.clone(),
            username: "carol".to_string(),
        }]
    );

    assert!(db.delete_friendship(&bob.id, &alice.id).await.unwrap());
    assert!(!db.delete_friendship(&bob.id, &alice.id).await.unwrap());
    assert_eq!(db.count_friendships().await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_user_cascades_and_fixes_like_counts() {
    let (db, _temp_dir) = create_test_db().await;
    let users = insert_users(&db, &["alice", "bob"]).await;
    let (alice, bob) = (&users[0], &users[1]);

    let alice_tweet = new_tweet(alice, "from alice");
    let bob_tweet = new_tweet(bob, "from bob");
    db.insert_tweet(&alice_tweet).await.unwrap();
    db.insert_tweet(&bob_tweet).await.unwrap();

    db.insert_like(&bob.id, &alice_tweet.id).await.unwrap();
    db.insert_like(&alice.id, &bob_tweet.id).await.unwrap();
    db.insert_friendship_if_absent(&bob.id, &alice.id).await.unwrap();

    assert!(db.delete_user(&alice.id).await.unwrap());
    assert!(!db.delete_user(&alice.id).await.unwrap());

    assert!(db.get_tweet(&alice_tweet.id).await.unwrap().is_none());
    assert_eq!(db.count_friendships().await.unwrap(), 0);
    assert!(db.get_liked_tweet_ids(&bob.id).await.unwrap().is_empty());

    let remaining = db.get_tweet(&bob_tweet.id).await.unwrap().unwrap();
    assert_eq!(remaining.like_count, 0);
    assert_eq!(db.count_likes_for_tweet(&bob_tweet.id).await.unwrap(), 0);
}
