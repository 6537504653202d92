//! 用户提示模块
//!
//! 信号驱动的错误提示栈：管线、守卫与视图通过 [`Notifier`]
//! 推送消息，[`NoticeStack`] 渲染并在数秒后自动移除。

use leptos::prelude::*;

/// 提示自动消失的时长
const DISMISS_AFTER_SECS: u64 = 3;

/// 单条提示
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub message: String,
}

/// 提示服务
#[derive(Clone, Copy)]
pub struct Notifier {
    notices: RwSignal<Vec<Notice>>,
    next_id: RwSignal<u32>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    /// 推送一条错误提示，返回其 id
    pub fn error(&self, message: &str) -> u32 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.notices.update(|notices| {
            notices.push(Notice {
                id,
                message: message.to_string(),
            });
        });
        id
    }

    /// 移除指定提示（重复移除无害）
    pub fn dismiss(&self, id: u32) {
        self.notices.update(|notices| {
            notices.retain(|notice| notice.id != id);
        });
    }

    /// 当前提示列表信号
    pub fn notices(&self) -> RwSignal<Vec<Notice>> {
        self.notices
    }
}

/// 从 Context 获取提示服务
pub fn use_notifier() -> Notifier {
    expect_context::<Notifier>()
}

/// 提示栈组件
#[component]
pub fn NoticeStack() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || notifier.notices().get()
                key=|notice| notice.id
                children=move |notice| {
                    // 挂载即排定自动消失
                    let id = notice.id;
                    set_timeout(
                        move || notifier.dismiss(id),
                        std::time::Duration::from_secs(DISMISS_AFTER_SECS),
                    );
                    view! {
                        <div class="alert alert-error shadow-lg">
                            <span>{notice.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_accumulate_in_order_with_unique_ids() {
        let notifier = Notifier::new();
        let first = notifier.error("one");
        let second = notifier.error("two");
        assert_ne!(first, second);

        let notices = notifier.notices().get_untracked();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "one");
        assert_eq!(notices[1].message, "two");
    }

    #[test]
    fn dismiss_removes_only_the_given_notice() {
        let notifier = Notifier::new();
        let first = notifier.error("one");
        notifier.error("two");

        notifier.dismiss(first);
        let notices = notifier.notices().get_untracked();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "two");

        // double dismiss is harmless
        notifier.dismiss(first);
        assert_eq!(notifier.notices().get_untracked().len(), 1);
    }
}
