//! 推文资源端点
//!
//! 与后端 `/tweets` 路由组一一对应。

use serde_json::json;

use super::{ApiRequest, AuthMode, paged};
use crate::models::TweetForm;

pub fn create_tweet(form: &TweetForm) -> ApiRequest {
    ApiRequest::post(
        AuthMode::Service,
        "/tweets",
        json!({
            "text": form.text,
            "image": form.image,
        }),
    )
}

pub fn create_reply_tweet(id: u64, form: &TweetForm) -> ApiRequest {
    ApiRequest::post(
        AuthMode::Service,
        format!("/tweets/{}/reply", id),
        json!({
            "text": form.text,
            "image": form.image,
        }),
    )
}

pub fn get_tweets(page: Option<u32>) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, paged("/tweets".to_string(), page))
}

pub fn get_tweet_by_id(id: u64) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, format!("/tweets/{}", id))
}

/// 回复列表（后端路径沿用 `replys` 拼写）
pub fn get_reply_tweets(id: u64) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, format!("/tweets/{}/replys", id))
}

pub fn delete_tweet(id: u64) -> ApiRequest {
    ApiRequest::delete(AuthMode::Service, format!("/tweets/{}", id))
}

pub fn get_liked_users(id: u64, page: Option<u32>) -> ApiRequest {
    ApiRequest::get(
        AuthMode::WithoutAuth,
        paged(format!("/tweets/{}/liking_users", id), page),
    )
}
