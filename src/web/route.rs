//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。路由表来自产品原型：
//! 登录/注册/首页/个人资料/设置，外加按用户名寻址的用户页、
//! 关注列表页（`followers` 与 `following` 互为别名）和推文详情页，
//! 未匹配路径兜底到 404。

/// 设置页子路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    /// 个人资料编辑
    Profile,
    /// 用户管理（管理员）
    Users,
}

/// 关注列表页的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowTab {
    Followers,
    Following,
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Register,
    /// 首页（`/` 与 `/home` 等价）
    Home,
    /// 当前用户自己的资料页
    Profile,
    Configuration(ConfigSection),
    /// 按用户名寻址的用户页 `/:user`
    User { user_name: String },
    /// 关注列表页 `/:user/followers`，别名 `/:user/following`
    Follow { user_name: String, tab: FollowTab },
    /// 推文详情页 `/:user/status/:tweet`
    Tweet { user_name: String, tweet_id: String },
    Forbidden,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由（查询串与片段先剥离）
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path)
            .trim_end_matches('/');

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["home"] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["profile"] => Self::Profile,
            ["configuration"] | ["configuration", "profile"] => {
                Self::Configuration(ConfigSection::Profile)
            }
            ["configuration", "users"] => Self::Configuration(ConfigSection::Users),
            ["403"] => Self::Forbidden,
            ["404"] => Self::NotFound,
            [user] => Self::User {
                user_name: (*user).to_string(),
            },
            [user, "followers"] => Self::Follow {
                user_name: (*user).to_string(),
                tab: FollowTab::Followers,
            },
            [user, "following"] => Self::Follow {
                user_name: (*user).to_string(),
                tab: FollowTab::Following,
            },
            [user, "status", tweet] => Self::Tweet {
                user_name: (*user).to_string(),
                tweet_id: (*tweet).to_string(),
            },
            _ => Self::NotFound,
        }
    }

    /// 路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Home => "/home".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Configuration(ConfigSection::Profile) => "/configuration/profile".to_string(),
            Self::Configuration(ConfigSection::Users) => "/configuration/users".to_string(),
            Self::User { user_name } => format!("/{}", user_name),
            Self::Follow {
                user_name,
                tab: FollowTab::Followers,
            } => format!("/{}/followers", user_name),
            Self::Follow {
                user_name,
                tab: FollowTab::Following,
            } => format!("/{}/following", user_name),
            Self::Tweet {
                user_name,
                tweet_id,
            } => format!("/{}/status/{}", user_name, tweet_id),
            Self::Forbidden => "/403".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 页面标题（最终拼为 `<title> / Twitter`）
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Home => "Home",
            Self::Profile => "Profile",
            Self::Configuration(ConfigSection::Profile) => "Configuration",
            Self::Configuration(ConfigSection::Users) => "Users",
            Self::User { .. } => "User",
            Self::Follow { .. } => "Follow",
            Self::Tweet { .. } => "Tweet",
            Self::Forbidden => "403",
            Self::NotFound => "404",
        }
    }

    /// **守卫白名单：无会话时仍可访问的路由**
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}
