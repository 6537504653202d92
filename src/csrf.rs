//! CSRF 令牌缓存模块
//!
//! "取缓存值、缺失即刷新" 的抽象：令牌只存内存（页面刷新即失效），
//! 首个状态变更请求触发获取，并发调用方合流到同一次进行中的
//! 获取上，避免重复请求。
//!
//! 状态机：{无令牌} → (变更请求发起) → {获取中} → (获取成功) →
//! {就绪，已缓存}；获取失败回到 {无令牌}，原请求不会被发出。

use std::future::Future;

use futures::channel::oneshot;
use leptos::prelude::*;

use crate::http::ApiError;

type FetchResult = Result<String, ApiError>;

/// 带刷新的令牌缓存
///
/// 只有首个调用方真正执行 `fetch`；其间到达的调用方登记一个
/// 等待席位，由完成者统一派发结果。
#[derive(Clone, Copy)]
pub struct CsrfCache {
    token: RwSignal<Option<String>>,
    in_flight: StoredValue<bool>,
    waiters: StoredValue<Vec<oneshot::Sender<FetchResult>>>,
}

impl Default for CsrfCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfCache {
    pub fn new() -> Self {
        Self {
            token: RwSignal::new(None),
            in_flight: StoredValue::new(false),
            waiters: StoredValue::new(Vec::new()),
        }
    }

    /// 当前缓存的令牌
    pub fn cached(&self) -> Option<String> {
        self.token.get_untracked()
    }

    /// 覆盖缓存（`None` 即清空）
    pub fn set(&self, token: Option<String>) {
        self.token.set(token);
    }

    /// 返回缓存令牌；缺失时用 `fetch` 获取一次并缓存。
    ///
    /// 并发调用只会触发一次 `fetch`。获取失败时缓存保持为空，
    /// 下一次调用重新触发获取。
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult>,
    {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        // 已有获取在进行中：登记席位等待派发
        if self.in_flight.get_value() {
            let (sender, receiver) = oneshot::channel();
            self.waiters.update_value(|waiters| waiters.push(sender));
            return receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::decode("token fetch was dropped")));
        }

        self.in_flight.set_value(true);
        let result = fetch().await;
        self.in_flight.set_value(false);

        if let Ok(token) = &result {
            self.token.set(Some(token.clone()));
        }

        let mut pending = Vec::new();
        self.waiters
            .update_value(|waiters| pending = std::mem::take(waiters));
        for waiter in pending {
            let _ = waiter.send(result.clone());
        }

        result
    }
}

#[cfg(test)]
mod tests;
