//! HTTP 拦截器管线模块（核心）
//!
//! 对应后端 `/api/v1` 的两个客户端变体：
//! - `WithoutAuth`：请求原样直发；
//! - `Service`：发送前先取得 CSRF 令牌并附加 `X-CSRF-Token` 请求头。
//!
//! 两个变体共享响应侧处理：按状态码分类错误、触发用户提示与
//! 恢复动作（重新登录 / 403 跳转），然后仍将错误抛给调用方。
//! 传输层、令牌来源与副作用均通过 trait 注入，便于单元测试。

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::{ApiRequest, Method};

/// 后端 API 基础路径
pub const API_BASE: &str = "/api/v1";
/// 固定请求超时（毫秒）
pub const REQUEST_TIMEOUT_MS: u32 = 7_000;
/// CSRF 令牌头，状态变更请求必须携带，令牌获取接口经响应头返回
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// 401 提示语
pub const SESSION_EXPIRED_TIP: &str = "Log in has expired, please login again";
/// 离线提示语
pub const OFFLINE_TIP: &str = "Internet has been offline, please check";

// =========================================================
// 错误类型
// =========================================================

/// 错误分类
///
/// 对应状态码语义；`Network` / `Offline` 表示未收到任何
/// HTTP 响应的传输层失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400: 业务校验失败
    BadRequest,
    /// 401: 会话过期 / 未认证
    Unauthorized,
    /// 403: 无权访问
    Forbidden,
    /// 404: 资源未找到
    NotFound,
    /// 其余带响应的状态码
    Server,
    /// 响应体解析失败
    Decode,
    /// 网络层失败（无响应）
    Network,
    /// 客户端检测到离线
    Offline,
}

/// 管线产出的错误
///
/// 管线在构造它之前已完成提示与恢复等副作用，调用方仍可按需
/// 做本地处理（如表单内联报错）。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ErrorKind,
    /// 有 HTTP 响应时的状态码
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// 传输层失败（未拿到 HTTP 响应，含超时）
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError(pub String);

// =========================================================
// 注入点
// =========================================================

/// 即将交给传输层的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// HTTP 响应
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    /// 是否 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 按名称取响应头（大小写不敏感）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 反序列化响应体
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::decode(e.to_string()))
    }
}

/// 传输层抽象
///
/// 真实实现见 `fetch::FetchTransport`；测试中以脚本化的
/// Mock 替代。
#[async_trait(?Send)]
pub trait Transport {
    /// 发出请求。`Err` 表示未收到任何 HTTP 响应。
    async fn dispatch(&self, request: PreparedRequest) -> Result<Reply, TransportError>;

    /// 客户端是否处于离线状态
    fn is_offline(&self) -> bool {
        false
    }
}

/// Service 变体的 CSRF 令牌来源
#[async_trait(?Send)]
pub trait TokenSource {
    /// 返回缓存令牌；缺失时触发一次获取（并发调用合流）。
    async fn get_or_fetch(&self) -> Result<String, ApiError>;
}

/// 错误侧副作用钩子：提示、恢复、诊断日志
pub trait ErrorHooks {
    /// 向用户弹出错误提示
    fn tip(&self, message: &str);
    /// 会话过期：延迟后注销并跳转登录页
    fn session_expired(&self);
    /// 跳转 403 页面
    fn forbidden(&self);
    /// 诊断日志，任何失败在分类前都会经过这里
    fn log_failure(&self, detail: &str);
}

// =========================================================
// 管线
// =========================================================

/// 共享的传输层句柄
pub type SharedTransport = Arc<dyn Transport + Send + Sync>;
/// 共享的错误钩子句柄
pub type SharedHooks = Arc<dyn ErrorHooks + Send + Sync>;
/// 共享的令牌来源句柄
pub type SharedTokens = Arc<dyn TokenSource + Send + Sync>;

/// 拦截器管线实例
pub struct Pipeline {
    base: String,
    transport: SharedTransport,
    hooks: SharedHooks,
    /// `Some` 即 Service 变体
    tokens: Option<SharedTokens>,
}

impl Pipeline {
    /// 无认证变体：请求原样直发
    pub fn without_auth(transport: SharedTransport, hooks: SharedHooks) -> Self {
        Self {
            base: API_BASE.to_string(),
            transport,
            hooks,
            tokens: None,
        }
    }

    /// Service 变体：发送前附加 CSRF 令牌
    pub fn service(
        transport: SharedTransport,
        hooks: SharedHooks,
        tokens: SharedTokens,
    ) -> Self {
        Self {
            base: API_BASE.to_string(),
            transport,
            hooks,
            tokens: Some(tokens),
        }
    }

    /// 执行一次请求
    ///
    /// 令牌获取失败时原请求不会被发出。
    pub async fn execute(&self, request: ApiRequest) -> Result<Reply, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        // 请求拦截：取令牌必须在发出被包裹的请求之前完成
        if let Some(tokens) = &self.tokens {
            let token = tokens.get_or_fetch().await?;
            headers.push((CSRF_HEADER.to_string(), token));
        }

        let prepared = PreparedRequest {
            url: format!("{}{}", self.base, request.path),
            method: request.method,
            headers,
            body: request.body.as_ref().map(|value| value.to_string()),
        };

        match self.transport.dispatch(prepared).await {
            Ok(reply) if reply.ok() => Ok(reply),
            Ok(reply) => Err(self.classify_http(reply)),
            Err(failure) => Err(self.classify_network(failure)),
        }
    }

    /// 执行并反序列化响应体
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let reply = self.execute(request).await?;
        reply.json()
    }

    /// 响应拦截：带响应的失败按状态码分类
    fn classify_http(&self, reply: Reply) -> ApiError {
        self.hooks
            .log_failure(&format!("HTTP {}: {}", reply.status, reply.body));

        let message = server_error_message(&reply.body);
        let kind = match reply.status {
            400 => {
                self.hooks.tip(&message);
                ErrorKind::BadRequest
            }
            401 => {
                self.hooks.tip(SESSION_EXPIRED_TIP);
                self.hooks.session_expired();
                ErrorKind::Unauthorized
            }
            403 => {
                self.hooks.forbidden();
                ErrorKind::Forbidden
            }
            404 => {
                self.hooks.tip(&message);
                ErrorKind::NotFound
            }
            _ => {
                self.hooks.tip(&format!("Unknown Error: {}", message));
                ErrorKind::Server
            }
        };

        ApiError {
            kind,
            status: Some(reply.status),
            message,
        }
    }

    /// 响应拦截：无响应的失败只区分离线与一般网络错误，
    /// 不会去读取不存在的响应体。
    fn classify_network(&self, failure: TransportError) -> ApiError {
        self.hooks.log_failure(&format!("network: {}", failure.0));

        let kind = if self.transport.is_offline() {
            self.hooks.tip(OFFLINE_TIP);
            ErrorKind::Offline
        } else {
            ErrorKind::Network
        };

        ApiError {
            kind,
            status: None,
            message: failure.0,
        }
    }
}

/// 从错误响应体提取服务端消息（`{"error": "..."}`），
/// 非 JSON 时退回原始文本。
fn server_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|message| message.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
pub(crate) mod tests;
