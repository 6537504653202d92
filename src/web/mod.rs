//! 浏览器侧基础设施：路由、导航守卫、进度指示与本地存储。

pub mod guard;
pub mod progress;
pub mod route;
pub mod router;
pub mod storage;
