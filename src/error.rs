//! 错误呈现模块（浏览器侧）
//!
//! 把管线的 [`ErrorHooks`] 接到真实界面上：提示走 [`Notifier`]，
//! 会话过期与 403 走路由跳转，诊断日志进浏览器控制台。
//!
//! Api 与 RouterService 在管线之后才能构造，因此恢复链接在
//! 应用装配完成后经 [`BrowserHooks::attach`] 补齐。

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{Api, user};
use crate::http::ErrorHooks;
use crate::notify::Notifier;
use crate::store::Store;
use crate::web::route::AppRoute;
use crate::web::router::RouterService;

/// 401 恢复动作前的停留时长（毫秒），让提示先被看到
const RECOVERY_DELAY_MS: u32 = 1_000;

/// 恢复动作依赖的后期装配件
#[derive(Clone)]
pub struct RecoveryLinks {
    pub api: Api,
    pub router: RouterService,
}

/// 浏览器端错误钩子
#[derive(Clone)]
pub struct BrowserHooks {
    notifier: Notifier,
    store: Store,
    links: StoredValue<Option<RecoveryLinks>>,
    /// 恢复流程进行中；注销请求自身再 401 时不得重入
    recovering: StoredValue<bool>,
}

impl BrowserHooks {
    pub fn new(notifier: Notifier, store: Store) -> Self {
        Self {
            notifier,
            store,
            links: StoredValue::new(None),
            recovering: StoredValue::new(false),
        }
    }

    /// 管线与路由就绪后补齐恢复链接
    pub fn attach(&self, links: RecoveryLinks) {
        self.links.set_value(Some(links));
    }

    fn linked(&self) -> Option<RecoveryLinks> {
        self.links.with_value(Clone::clone)
    }
}

impl ErrorHooks for BrowserHooks {
    fn tip(&self, message: &str) {
        self.notifier.error(message);
    }

    fn session_expired(&self) {
        if self.recovering.get_value() {
            return;
        }
        self.recovering.set_value(true);

        let store = self.store.clone();
        let linked = self.linked();
        let recovering = self.recovering;
        spawn_local(async move {
            // 让过期提示停留片刻再离开当前页面
            TimeoutFuture::new(RECOVERY_DELAY_MS).await;

            if let Some(links) = linked {
                // 通知后端作废会话；失败不影响本地清理
                let _ = links.api.send(user::logout()).await;
                store.remove_user_info();
                links.router.replace(AppRoute::Login);
            } else {
                store.remove_user_info();
            }
            recovering.set_value(false);
        });
    }

    fn forbidden(&self) {
        if let Some(links) = self.linked() {
            links.router.replace(AppRoute::Forbidden);
        }
    }

    fn log_failure(&self, detail: &str) {
        web_sys::console::error_1(&format!("[api] {}", detail).into());
    }
}
