//! 用户资源端点
//!
//! 与后端 `/users` 路由组一一对应。关注/点赞等状态变更端点
//! 走 Service 管线，其余走 WithoutAuth。

use serde_json::json;

use super::{ApiRequest, AuthMode, paged};
use crate::models::{RegisterForm, UpdateUserForm};

pub fn register(form: &RegisterForm) -> ApiRequest {
    ApiRequest::post(
        AuthMode::WithoutAuth,
        "/users/register",
        json!({
            "user_name": form.user_name,
            "name": form.name,
            "email": form.email,
            "password": form.password,
        }),
    )
}

pub fn login(email: &str, password: &str) -> ApiRequest {
    ApiRequest::post(
        AuthMode::WithoutAuth,
        "/users/login",
        json!({
            "email": email,
            "password": password,
        }),
    )
}

pub fn logout() -> ApiRequest {
    ApiRequest::post_empty(AuthMode::WithoutAuth, "/users/logout")
}

pub fn get_me() -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, "/users/me")
}

pub fn get_user_by_id(user_id: &str) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, format!("/users/{}", user_id))
}

pub fn get_user_by_name(user_name: &str) -> ApiRequest {
    ApiRequest::get(
        AuthMode::WithoutAuth,
        format!("/users/username/{}", user_name),
    )
}

pub fn get_all_users(page: Option<u32>) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, paged("/users".to_string(), page))
}

pub fn update_user(user_id: &str, form: &UpdateUserForm) -> ApiRequest {
    ApiRequest::patch(
        AuthMode::Service,
        format!("/users/{}", user_id),
        json!({
            "user_name": form.user_name,
            "name": form.name,
            "gender": form.gender,
            "email": form.email,
            "about": form.about,
            "phone_number": form.phone_number,
            "country": form.country,
            "birthday": form.birthday,
        }),
    )
}

pub fn update_user_role(user_id: &str, role: &str) -> ApiRequest {
    ApiRequest::patch(
        AuthMode::Service,
        format!("/users/{}/role", user_id),
        json!({ "role": role }),
    )
}

pub fn delete_user(user_id: &str) -> ApiRequest {
    ApiRequest::delete(AuthMode::Service, format!("/users/{}", user_id))
}

pub fn follow(follower_id: &str, following_id: &str) -> ApiRequest {
    ApiRequest::post(
        AuthMode::Service,
        format!("/users/{}/following", follower_id),
        json!({ "user_id": following_id }),
    )
}

pub fn get_following(user_id: &str, page: Option<u32>) -> ApiRequest {
    ApiRequest::get(
        AuthMode::Service,
        paged(format!("/users/{}/following", user_id), page),
    )
}

pub fn get_followers(user_id: &str, page: Option<u32>) -> ApiRequest {
    ApiRequest::get(
        AuthMode::Service,
        paged(format!("/users/{}/followers", user_id), page),
    )
}

pub fn delete_following(follower_id: &str, following_id: &str) -> ApiRequest {
    ApiRequest::delete(
        AuthMode::Service,
        format!("/users/{}/following/{}", follower_id, following_id),
    )
}

pub fn get_tweets_by_user_id(user_id: &str, page: Option<u32>) -> ApiRequest {
    ApiRequest::get(
        AuthMode::WithoutAuth,
        paged(format!("/users/{}/tweets", user_id), page),
    )
}

pub fn get_liked_tweets(user_id: &str, page: Option<u32>) -> ApiRequest {
    ApiRequest::get(
        AuthMode::WithoutAuth,
        paged(format!("/users/{}/liked_tweets", user_id), page),
    )
}

pub fn like_tweet(user_id: &str, tweet_id: u64) -> ApiRequest {
    ApiRequest::post(
        AuthMode::Service,
        format!("/users/{}/liked", user_id),
        json!({ "tweet_id": tweet_id }),
    )
}

pub fn delete_like(user_id: &str, tweet_id: u64) -> ApiRequest {
    ApiRequest::delete(
        AuthMode::Service,
        format!("/users/{}/liked/{}", user_id, tweet_id),
    )
}

/// CSRF 令牌获取端点，令牌在 `X-CSRF-Token` 响应头中返回
pub fn get_csrf_token() -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, "/users/token")
}
