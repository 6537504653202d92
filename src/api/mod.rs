//! API 客户端模块
//!
//! 每个后端端点一个纯函数，构造请求描述符（路径 + 方法 + 载荷 +
//! 管线变体），由 [`Api`] 交给对应的拦截器管线执行。
//! 函数本身不做任何 I/O，便于单独测试。

pub mod tweet;
pub mod user;

use std::sync::Arc;

use leptos::prelude::expect_context;
use serde::de::DeserializeOwned;

use crate::http::{ApiError, Pipeline, Reply};

/// 固定分页大小
pub const PAGE_SIZE: u32 = 10;

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// 管线变体选择
///
/// 状态变更端点走 `Service`（携带 CSRF 令牌），只读端点与
/// 登录/注册走 `WithoutAuth`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    WithoutAuth,
    Service,
}

/// 请求描述符
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// 相对于 `/api/v1` 的路径（可含查询串）
    pub path: String,
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub auth: AuthMode,
}

impl ApiRequest {
    pub fn get(auth: AuthMode, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            body: None,
            auth,
        }
    }

    pub fn post(auth: AuthMode, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            method: Method::Post,
            body: Some(body),
            auth,
        }
    }

    /// 无载荷的 POST（如注销）
    pub fn post_empty(auth: AuthMode, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Post,
            body: None,
            auth,
        }
    }

    pub fn patch(auth: AuthMode, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            method: Method::Patch,
            body: Some(body),
            auth,
        }
    }

    pub fn delete(auth: AuthMode, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Delete,
            body: None,
            auth,
        }
    }
}

/// 附加分页查询串
///
/// `None` 表示首页：完全省略查询参数。`Some(p)` 生成
/// `?page=<p>&size=10`，避免旧版 `&size=10` 拼接出的畸形
/// 查询串。
pub(crate) fn paged(path: String, page: Option<u32>) -> String {
    match page {
        None => path,
        Some(page) => format!("{}?page={}&size={}", path, page, PAGE_SIZE),
    }
}

/// 两个管线变体的门面
///
/// 通过 Context 注入组件树，按描述符的 [`AuthMode`] 选择管线。
#[derive(Clone)]
pub struct Api {
    without_auth: Arc<Pipeline>,
    service: Arc<Pipeline>,
}

impl Api {
    pub fn new(without_auth: Arc<Pipeline>, service: Arc<Pipeline>) -> Self {
        Self {
            without_auth,
            service,
        }
    }

    fn pipeline(&self, auth: AuthMode) -> &Pipeline {
        match auth {
            AuthMode::WithoutAuth => &self.without_auth,
            AuthMode::Service => &self.service,
        }
    }

    /// 执行描述符，返回原始响应
    pub async fn send(&self, request: ApiRequest) -> Result<Reply, ApiError> {
        self.pipeline(request.auth).execute(request).await
    }

    /// 执行描述符并反序列化响应体
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.pipeline(request.auth).json(request).await
    }
}

/// 从 Context 获取 API 门面
pub fn use_api() -> Api {
    expect_context::<Api>()
}

#[cfg(test)]
mod tests;
