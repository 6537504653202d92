//! 数据模型模块
//!
//! 与后端 REST API 的 JSON 契约一一对应：用户、推文、
//! 分页列表封套以及各类表单载荷。

use serde::{Deserialize, Serialize};

/// 用户记录
///
/// 由 Store 独占持有，视图只读。可选字段对应后端的
/// `omitempty` 序列化行为。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    /// 粉丝数（部分接口不返回）
    #[serde(default)]
    pub followers: Option<i64>,
    /// 关注数（部分接口不返回）
    #[serde(default)]
    pub following: Option<i64>,
    /// 当前会话用户是否已关注该用户
    #[serde(default)]
    pub is_following: Option<bool>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub login_date: String,
}

/// 登录/注册响应：用户记录加会话令牌
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserWithToken {
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub token: String,
}

/// 用户分页列表封套
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsersList {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub users: Vec<User>,
}

/// 推文（含作者摘要字段）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TweetWithUser {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub replys: i64,
    /// 当前会话用户是否已点赞
    #[serde(default)]
    pub already_liked: bool,
}

/// 推文分页列表封套
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TweetsList {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub tweets: Vec<TweetWithUser>,
}

/// 注册表单
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegisterForm {
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 个人资料更新表单
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UpdateUserForm {
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub about: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub birthday: Option<String>,
}

/// 发推/回复表单
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TweetForm {
    pub text: String,
    pub image: Option<String>,
}
