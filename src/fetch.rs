//! Fetch 传输层模块
//!
//! [`Transport`] 的浏览器实现：基于 gloo-net 的 Fetch 封装，
//! 外加固定超时。超时通过与 `TimeoutFuture` 竞速实现，
//! 超时同样归类为传输层失败。

use async_trait::async_trait;
use futures::future::{Either, select};
use futures::pin_mut;
use gloo_net::http::RequestBuilder;
use gloo_timers::future::TimeoutFuture;

use crate::api::Method;
use crate::http::{PreparedRequest, REQUEST_TIMEOUT_MS, Reply, Transport, TransportError};

/// 浏览器 Fetch 传输层
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn dispatch(&self, request: PreparedRequest) -> Result<Reply, TransportError> {
        let method = match request.method {
            Method::Get => gloo_net::http::Method::GET,
            Method::Post => gloo_net::http::Method::POST,
            Method::Patch => gloo_net::http::Method::PATCH,
            Method::Delete => gloo_net::http::Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let prepared = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError(e.to_string()))?,
            None => builder.build().map_err(|e| TransportError(e.to_string()))?,
        };

        let send = prepared.send();
        let deadline = TimeoutFuture::new(REQUEST_TIMEOUT_MS);
        pin_mut!(send);
        let response = match select(send, deadline).await {
            Either::Left((result, _)) => result.map_err(|e| TransportError(e.to_string()))?,
            Either::Right(_) => {
                return Err(TransportError(format!(
                    "request timed out after {}ms",
                    REQUEST_TIMEOUT_MS
                )));
            }
        };

        let status = response.status();
        let headers = response.headers().entries().collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Reply {
            status,
            headers,
            body,
        })
    }

    fn is_offline(&self) -> bool {
        web_sys::window()
            .map(|window| !window.navigator().on_line())
            .unwrap_or(false)
    }
}
