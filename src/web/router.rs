//! 路由服务模块 - 核心引擎
//!
//! 封装 History API，所有对 window.history 的操作集中在此。
//! 导航流程：请求 -> 守卫（异步） -> 落地 -> 标题与进度收尾。
//! 守卫决策本身在 `guard` 模块，纯函数可单测；这里只负责把
//! 决策落到 History、信号与 document.title 上。

use std::sync::Arc;

use async_trait::async_trait;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use super::guard::{self, GuardContext, GuardDecision};
use super::progress::{Progress, use_progress};
use super::route::AppRoute;
use super::storage::LocalStorage;
use crate::api::{Api, use_api};
use crate::http::ApiError;
use crate::notify::{Notifier, use_notifier};
use crate::store::{Store, use_store};

/// 标题后缀
const TITLE_SUFFIX: &str = " / Twitter";

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 替换 History 状态（重定向与初始落地）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 把落地路由写进 document.title
fn apply_document_title(route: &AppRoute) {
    if let Some(window) = web_sys::window()
        && let Some(document) = window.document()
    {
        document.set_title(&format!("{}{}", route.title(), TITLE_SUFFIX));
    }
}

/// 守卫读取的真实应用状态
struct LiveGuardContext {
    store: Store,
    api: Api,
}

#[async_trait(?Send)]
impl GuardContext for LiveGuardContext {
    fn has_session(&self) -> bool {
        if !self.store.token.get_untracked().is_empty() {
            return true;
        }
        LocalStorage::session_token().is_some_and(|token| !token.is_empty())
    }

    fn loaded_user_name(&self) -> Option<String> {
        if !self.store.user_loaded() {
            return None;
        }
        Some(self.store.user.with_untracked(|user| user.user_name.clone()))
    }

    async fn fetch_current_user(&self) -> Result<String, ApiError> {
        self.store.get_me(&self.api).await?;
        Ok(self.store.user.with_untracked(|user| user.user_name.clone()))
    }

    fn invalidate_session(&self) {
        self.store.remove_user_info();
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；守卫依赖（Store / Api / 提示 /
/// 进度）在构造时注入。
#[derive(Clone)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    deps: Arc<RouterDeps>,
}

struct RouterDeps {
    store: Store,
    api: Api,
    notifier: Notifier,
    progress: Progress,
}

impl RouterService {
    fn new(store: Store, api: Api, notifier: Notifier, progress: Progress) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            deps: Arc::new(RouterDeps {
                store,
                api,
                notifier,
                progress,
            }),
        }
    }

    /// 当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 按路径导航（链接点击）
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 按路由导航，推入新的历史记录
    pub fn push(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 按路由导航，替换当前历史记录
    pub fn replace(&self, route: AppRoute) {
        self.navigate_to_route(route, false);
    }

    /// **核心方法：导航与守卫**
    ///
    /// 守卫是异步的（可能触发一次 `get_me`），期间进度指示器
    /// 保持激活；无论放行、重定向还是守卫出错都收尾。
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let set_route = self.set_route;
        let deps = self.deps.clone();

        spawn_local(async move {
            deps.progress.start();

            let ctx = LiveGuardContext {
                store: deps.store.clone(),
                api: deps.api.clone(),
            };
            let landed = match guard::check(&target_route, &ctx).await {
                GuardDecision::Allow => {
                    if use_push {
                        push_history_state(&target_route.to_path());
                    } else {
                        replace_history_state(&target_route.to_path());
                    }
                    target_route
                }
                GuardDecision::Redirect { to, notice } => {
                    if let Some(notice) = notice {
                        deps.notifier.error(notice);
                    }
                    // 重定向一律 replace：后退键不应回到被拒绝的入口
                    replace_history_state(&to.to_path());
                    to
                }
            };

            set_route.set(landed.clone());
            apply_document_title(&landed);
            deps.progress.done();
        });
    }

    /// 初始化浏览器后退/前进按钮监听
    ///
    /// popstate 落地的路径同样过守卫，且以 replace 方式修正。
    fn init_popstate_listener(&self) {
        let router = self.clone();

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            router.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 首次加载：当前地址栏路径过守卫后落地
    fn navigate_initial(&self) {
        let initial = self.current_route.get_untracked();
        self.navigate_to_route(initial, false);
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new(use_store(), use_api(), use_notifier(), use_progress());

    router.init_popstate_listener();
    router.navigate_initial();

    provide_context(router.clone());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 Store / Api / Notifier / Progress
/// 之后、其余界面之前挂载。
#[component]
pub fn Router(
    /// 错误钩子的后期装配回调：拿到路由服务后补齐恢复链接
    #[prop(optional)]
    on_ready: Option<Box<dyn FnOnce(RouterService)>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    let router = provide_router();
    if let Some(on_ready) = on_ready {
        on_ready(router);
    }

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 应用内链接组件
///
/// 拦截点击走 History 导航，保留 href 以便中键/新标签打开。
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)] to: String,
    /// 额外的 CSS class
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let href = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
