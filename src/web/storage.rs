//! LocalStorage 封装模块
//!
//! 会话令牌的唯一持久化机制：登录/注册时写入，注销或会话失效时
//! 整体清空。非 wasm 目标下用进程内 HashMap 充当存储，
//! 使 Store 与守卫的单元测试无需浏览器即可运行。

/// 会话令牌的固定存储键
pub const SESSION_TOKEN_KEY: &str = "session.token";

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    /// 读取持久化的会话令牌
    pub fn session_token() -> Option<String> {
        Self::get(SESSION_TOKEN_KEY)
    }

    /// 持久化会话令牌
    pub fn set_session_token(token: &str) {
        Self::set(SESSION_TOKEN_KEY, token);
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|storage| storage.set_item(key, value).ok())
            .is_some()
    }

    /// 整体清空（注销 / 会话失效）
    pub fn clear() {
        if let Some(storage) = Self::storage() {
            let _ = storage.clear();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        pub(super) static STORE: RefCell<HashMap<String, String>> =
            RefCell::new(HashMap::new());
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalStorage {
    pub fn get(key: &str) -> Option<String> {
        native::STORE.with(|store| store.borrow().get(key).cloned())
    }

    pub fn set(key: &str, value: &str) -> bool {
        native::STORE.with(|store| {
            store.borrow_mut().insert(key.to_string(), value.to_string());
        });
        true
    }

    pub fn clear() {
        native::STORE.with(|store| store.borrow_mut().clear());
    }
}
