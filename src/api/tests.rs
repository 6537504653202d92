use super::*;
use crate::api::{tweet, user};
use crate::models::{RegisterForm, TweetForm, UpdateUserForm};

// =========================================================
// Pagination
// =========================================================

#[test]
fn paged_omits_query_for_first_page() {
    assert_eq!(paged("/tweets".to_string(), None), "/tweets");
    assert_eq!(
        paged("/users/42/followers".to_string(), None),
        "/users/42/followers"
    );
}

#[test]
fn paged_appends_page_and_fixed_size() {
    assert_eq!(paged("/tweets".to_string(), Some(3)), "/tweets?page=3&size=10");
    assert_eq!(
        paged("/users/42/following".to_string(), Some(1)),
        "/users/42/following?page=1&size=10"
    );
}

#[test]
fn every_paginated_builder_honors_the_page_contract() {
    // (builder, base path) pairs covering all paginated endpoints
    let cases: Vec<(Box<dyn Fn(Option<u32>) -> ApiRequest>, &str)> = vec![
        (Box::new(user::get_all_users), "/users"),
        (
            Box::new(|p| user::get_following("u1", p)),
            "/users/u1/following",
        ),
        (
            Box::new(|p| user::get_followers("u1", p)),
            "/users/u1/followers",
        ),
        (
            Box::new(|p| user::get_tweets_by_user_id("u1", p)),
            "/users/u1/tweets",
        ),
        (
            Box::new(|p| user::get_liked_tweets("u1", p)),
            "/users/u1/liked_tweets",
        ),
        (Box::new(tweet::get_tweets), "/tweets"),
        (
            Box::new(|p| tweet::get_liked_users(7, p)),
            "/tweets/7/liking_users",
        ),
    ];

    for (build, base) in cases {
        let first = build(None);
        assert_eq!(first.path, *base, "first page must omit the query string");
        assert!(!first.path.contains("page="));
        assert!(!first.path.contains("size="));

        let later = build(Some(2));
        assert_eq!(later.path, format!("{}?page=2&size=10", base));
    }
}

// =========================================================
// Descriptor shapes
// =========================================================

#[test]
fn login_is_unauthenticated_post_with_credentials() {
    let request = user::login("a@b.c", "hunter2");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.auth, AuthMode::WithoutAuth);
    assert_eq!(request.path, "/users/login");
    let body = request.body.expect("login carries a body");
    assert_eq!(body["email"], "a@b.c");
    assert_eq!(body["password"], "hunter2");
}

#[test]
fn register_descriptor_shape() {
    let form = RegisterForm {
        user_name: "jack".into(),
        name: "Jack".into(),
        email: "jack@example.com".into(),
        password: "secret".into(),
    };
    let request = user::register(&form);
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.auth, AuthMode::WithoutAuth);
    assert_eq!(request.path, "/users/register");
    let body = request.body.expect("register carries a body");
    assert_eq!(body["user_name"], "jack");
    assert_eq!(body["password"], "secret");
}

#[test]
fn logout_is_unauthenticated_post_without_body() {
    let request = user::logout();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.auth, AuthMode::WithoutAuth);
    assert_eq!(request.path, "/users/logout");
    assert!(request.body.is_none());
}

#[test]
fn mutating_user_endpoints_use_the_service_pipeline() {
    let form = UpdateUserForm::default();
    for request in [
        user::update_user("u1", &form),
        user::update_user_role("u1", "admin"),
        user::delete_user("u1"),
        user::follow("u1", "u2"),
        user::delete_following("u1", "u2"),
        user::like_tweet("u1", 9),
        user::delete_like("u1", 9),
    ] {
        assert_eq!(request.auth, AuthMode::Service, "path {}", request.path);
    }
}

#[test]
fn mutating_tweet_endpoints_use_the_service_pipeline() {
    let form = TweetForm {
        text: "hello".into(),
        image: None,
    };
    for request in [
        tweet::create_tweet(&form),
        tweet::create_reply_tweet(3, &form),
        tweet::delete_tweet(3),
    ] {
        assert_eq!(request.auth, AuthMode::Service, "path {}", request.path);
    }
}

#[test]
fn follow_descriptor_targets_the_follower_and_carries_the_followee() {
    let request = user::follow("alice-id", "bob-id");
    assert_eq!(request.path, "/users/alice-id/following");
    assert_eq!(request.method, Method::Post);
    let body = request.body.expect("follow carries a body");
    assert_eq!(body["user_id"], "bob-id");
}

#[test]
fn reply_and_delete_paths_embed_the_tweet_id() {
    let form = TweetForm {
        text: "re".into(),
        image: None,
    };
    assert_eq!(tweet::create_reply_tweet(42, &form).path, "/tweets/42/reply");
    assert_eq!(tweet::delete_tweet(42).path, "/tweets/42");
    assert_eq!(tweet::get_reply_tweets(42).path, "/tweets/42/replys");
}

#[test]
fn csrf_token_endpoint_is_unauthenticated_get() {
    let request = user::get_csrf_token();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.auth, AuthMode::WithoutAuth);
    assert_eq!(request.path, "/users/token");
}
