//! 导航守卫模块
//!
//! 每次路由切换前执行的认证门禁，纯决策函数 + 注入的上下文，
//! 不触碰 History API，便于单元测试。
//!
//! 规则：
//! 1. 无会话令牌：只放行白名单（登录/注册），其余重定向到登录页
//!    并提示；
//! 2. 有会话令牌：访问登录页改投首页；用户记录未加载则先拉取，
//!    拉取失败视为会话失效（清空并回登录页）；目标路径的用户段
//!    与当前用户名相同则改投 `/profile`。

use async_trait::async_trait;

use super::route::AppRoute;
use crate::http::ApiError;

/// 无会话访问受限页面时的提示语
pub const LOGIN_REQUIRED_TIP: &str = "Please Log In";

/// 守卫决策
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// 放行目标路由
    Allow,
    /// 改投其他路由（以 replace 方式落地）
    Redirect {
        to: AppRoute,
        /// 需要弹给用户的提示
        notice: Option<&'static str>,
    },
}

impl GuardDecision {
    fn redirect(to: AppRoute) -> Self {
        Self::Redirect { to, notice: None }
    }
}

/// 守卫读取的外部状态
#[async_trait(?Send)]
pub trait GuardContext {
    /// 是否存在持久化的会话令牌
    fn has_session(&self) -> bool;
    /// 已加载的当前用户名（`None` 表示用户记录尚未加载）
    fn loaded_user_name(&self) -> Option<String>;
    /// 拉取当前用户记录，返回用户名
    async fn fetch_current_user(&self) -> Result<String, ApiError>;
    /// 会话失效：清空持久化与内存状态
    fn invalidate_session(&self);
}

/// 对目标路由执行守卫检查
pub async fn check(target: &AppRoute, ctx: &dyn GuardContext) -> GuardDecision {
    if !ctx.has_session() {
        if target.is_public() {
            return GuardDecision::Allow;
        }
        return GuardDecision::Redirect {
            to: AppRoute::Login,
            notice: Some(LOGIN_REQUIRED_TIP),
        };
    }

    // 已登录用户不停留在登录页
    if *target == AppRoute::Login {
        return GuardDecision::redirect(AppRoute::Home);
    }

    let user_name = match ctx.loaded_user_name() {
        Some(name) => name,
        None => match ctx.fetch_current_user().await {
            Ok(name) => name,
            Err(_) => {
                // 令牌存在但换不回用户记录：会话已失效
                ctx.invalidate_session();
                return GuardDecision::redirect(AppRoute::Login);
            }
        },
    };

    // 访问自己的用户页时改投资料页
    if let AppRoute::User { user_name: target_user } = target
        && *target_user == user_name
    {
        return GuardDecision::redirect(AppRoute::Profile);
    }

    GuardDecision::Allow
}
