//! 全局 Store 模块
//!
//! 持有会话令牌、CSRF 令牌与当前用户记录。变更（mutation）是
//! 同步的全量函数，动作（action）是异步工作单元：调用 API，
//! 成功才提交变更，失败时原样上抛、不动状态
//! （`remove_user_info` 例外：无条件清空且不会失败）。
//!
//! Store 是显式注入的状态容器：经 Context 提供给组件树，
//! 测试中按用例新建实例。

use leptos::prelude::*;

use crate::api::{Api, user};
use crate::csrf::CsrfCache;
use crate::http::{ApiError, CSRF_HEADER, Pipeline, TokenSource};
use crate::models::{RegisterForm, User, UserWithToken};
use crate::web::storage::LocalStorage;

use async_trait::async_trait;
use std::sync::Arc;

/// 全局状态容器
#[derive(Clone)]
pub struct Store {
    /// 当前用户记录，视图只读
    pub user: RwSignal<User>,
    /// 会话令牌（内存副本；持久化副本在 LocalStorage）
    pub token: RwSignal<String>,
    /// 会话 id
    pub session: RwSignal<String>,
    /// CSRF 令牌缓存（只存内存）
    pub csrf: CsrfCache,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(User::default()),
            token: RwSignal::new(String::new()),
            session: RwSignal::new(String::new()),
            csrf: CsrfCache::new(),
        }
    }

    // =========================================================
    // 变更（同步、全量）
    // =========================================================

    /// 整体替换用户记录
    pub fn set_user(&self, user: User) {
        self.user.set(user);
    }

    /// 按带符号增量调整关注数
    pub fn set_user_following(&self, delta: i64) {
        self.user.update(|user| {
            user.following = Some(user.following.unwrap_or(0) + delta);
        });
    }

    /// 替换会话令牌
    pub fn set_token(&self, token: String) {
        self.token.set(token);
    }

    /// 替换 CSRF 令牌（`None` 即清空）
    pub fn set_csrf_token(&self, token: Option<String>) {
        self.csrf.set(token);
    }

    /// 替换会话 id
    pub fn set_session(&self, session: String) {
        self.session.set(session);
    }

    // =========================================================
    // 派生读取
    // =========================================================

    /// 用户记录是否已加载
    pub fn user_loaded(&self) -> bool {
        self.user.with_untracked(|user| !user.user_id.is_empty())
    }

    /// 当前用户是否为管理员
    pub fn is_admin(&self) -> bool {
        self.user
            .with_untracked(|user| user.role.as_deref() == Some("admin"))
    }

    // =========================================================
    // 动作（异步）
    // =========================================================

    /// 注册：成功后持久化令牌并提交用户与令牌变更
    pub async fn register(&self, api: &Api, form: &RegisterForm) -> Result<(), ApiError> {
        let result: UserWithToken = api.json(user::register(form)).await?;
        self.commit_session(result);
        Ok(())
    }

    /// 登录：成功后持久化令牌并提交用户与令牌变更
    pub async fn login(&self, api: &Api, email: &str, password: &str) -> Result<(), ApiError> {
        let result: UserWithToken = api.json(user::login(email, password)).await?;
        self.commit_session(result);
        Ok(())
    }

    fn commit_session(&self, result: UserWithToken) {
        LocalStorage::set_session_token(&result.token);
        self.set_token(result.token);
        self.set_user(result.user);
    }

    /// 拉取当前用户记录
    pub async fn get_me(&self, api: &Api) -> Result<(), ApiError> {
        let me: User = api.json(user::get_me()).await?;
        self.set_user(me);
        Ok(())
    }

    /// 清空持久化与内存中的全部会话状态；永不失败
    pub fn remove_user_info(&self) {
        LocalStorage::clear();
        self.set_token(String::new());
        self.set_user(User::default());
        self.set_csrf_token(None);
    }

    /// 整体替换用户记录（动作别名，供视图在更新资料后提交）
    pub fn update_user_info(&self, user: User) {
        self.set_user(user);
    }

    /// 调整当前用户的关注数
    pub fn update_user_following(&self, delta: i64) {
        self.set_user_following(delta);
    }
}

/// 从 Context 获取 Store
pub fn use_store() -> Store {
    expect_context::<Store>()
}

// =========================================================
// Service 管线的令牌来源
// =========================================================

/// 把 Store 的 CSRF 缓存接到 Service 管线上
///
/// 获取动作本身走 WithoutAuth 管线（`GET /users/token`），
/// 令牌从响应头取出。
pub struct StoreTokenSource {
    pub store: Store,
    pub without_auth: Arc<Pipeline>,
}

#[async_trait(?Send)]
impl TokenSource for StoreTokenSource {
    async fn get_or_fetch(&self) -> Result<String, ApiError> {
        let pipeline = self.without_auth.clone();
        self.store
            .csrf
            .get_or_fetch(move || async move {
                let reply = pipeline.execute(user::get_csrf_token()).await?;
                reply
                    .header(CSRF_HEADER)
                    .map(str::to_owned)
                    .ok_or_else(|| ApiError::decode("missing X-CSRF-Token response header"))
            })
            .await
    }
}

#[cfg(test)]
mod tests;
