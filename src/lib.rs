//! Twitter 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `api`: 端点描述符与管线门面
//! - `http` / `fetch` / `csrf`: 拦截器管线、传输层与 CSRF 缓存
//! - `store`: 全局状态容器
//! - `web`: 路由、导航守卫、进度指示与本地存储
//! - `components`: UI 组件层

mod api;
mod components;
mod csrf;
mod error;
mod fetch;
mod http;
mod models;
mod notify;
mod store;
pub(crate) mod web;

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::Api;
use crate::components::configuration::ConfigurationPage;
use crate::components::errors::{ForbiddenPage, NotFoundPage};
use crate::components::follow::FollowPage;
use crate::components::home::HomePage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::tweet::TweetPage;
use crate::components::user::UserPage;
use crate::error::{BrowserHooks, RecoveryLinks};
use crate::fetch::FetchTransport;
use crate::http::{Pipeline, SharedHooks, SharedTokens, SharedTransport};
use crate::notify::{NoticeStack, Notifier};
use crate::store::{Store, StoreTokenSource};
use crate::web::progress::{Progress, ProgressBar};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet, RouterService};
use crate::web::storage::LocalStorage;

/// 路由匹配函数
///
/// 登录/注册/兜底页独立渲染，其余页面套在 [`Layout`] 外壳里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home => view! { <Layout><HomePage /></Layout> }.into_any(),
        AppRoute::Profile => view! { <Layout><ProfilePage /></Layout> }.into_any(),
        AppRoute::Configuration(section) => view! {
            <Layout><ConfigurationPage section=section /></Layout>
        }
        .into_any(),
        AppRoute::User { user_name } => view! {
            <Layout><UserPage user_name=user_name /></Layout>
        }
        .into_any(),
        AppRoute::Follow { user_name, tab } => view! {
            <Layout><FollowPage user_name=user_name tab=tab /></Layout>
        }
        .into_any(),
        AppRoute::Tweet {
            user_name,
            tweet_id,
        } => view! {
            <Layout><TweetPage user_name=user_name tweet_id=tweet_id /></Layout>
        }
        .into_any(),
        AppRoute::Forbidden => view! { <Layout><ForbiddenPage /></Layout> }.into_any(),
        AppRoute::NotFound => view! { <Layout><NotFoundPage /></Layout> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 基础服务入 Context
    let notifier = Notifier::new();
    provide_context(notifier);
    let progress = Progress::new();
    provide_context(progress);
    let store = Store::new();
    provide_context(store.clone());

    // 2. 装配两条管线：WithoutAuth 直发，Service 经 Store 取 CSRF 令牌
    let transport: SharedTransport = Arc::new(FetchTransport);
    let hooks = BrowserHooks::new(notifier, store.clone());
    let shared_hooks: SharedHooks = Arc::new(hooks.clone());
    let without_auth = Arc::new(Pipeline::without_auth(transport.clone(), shared_hooks.clone()));
    let tokens: SharedTokens = Arc::new(StoreTokenSource {
        store: store.clone(),
        without_auth: without_auth.clone(),
    });
    let service = Arc::new(Pipeline::service(transport, shared_hooks, tokens));
    let api = Api::new(without_auth, service);
    provide_context(api.clone());

    // 3. 把持久化的会话令牌恢复到内存
    if let Some(token) = LocalStorage::session_token() {
        store.set_token(token);
    }

    // 4. 路由器就绪后补齐错误钩子的恢复链接
    let on_ready = {
        let api = api.clone();
        Box::new(move |router: RouterService| {
            hooks.attach(RecoveryLinks { api, router });
        }) as Box<dyn FnOnce(RouterService)>
    };

    view! {
        <ProgressBar />
        <NoticeStack />
        <Router on_ready=on_ready>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
