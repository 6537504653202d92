//! 导航进度指示器模块
//!
//! 每次路由切换开始时 `start()`，无论成功、重定向还是失败都以
//! `done()` 收尾。用计数器而非布尔值，保证上一次切换收尾之前
//! 新切换的指示不会被误关。

use leptos::prelude::*;

/// 进度指示服务
#[derive(Clone, Copy)]
pub struct Progress {
    active: RwSignal<u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(0),
        }
    }

    /// 一次切换开始
    pub fn start(&self) {
        self.active.update(|count| *count += 1);
    }

    /// 一次切换结束（成功或失败）
    pub fn done(&self) {
        self.active.update(|count| *count = count.saturating_sub(1));
    }

    /// 是否有切换在进行中
    pub fn is_active(&self) -> bool {
        self.active.get() > 0
    }
}

/// 从 Context 获取进度服务
pub fn use_progress() -> Progress {
    expect_context::<Progress>()
}

/// 顶部进度条组件
#[component]
pub fn ProgressBar() -> impl IntoView {
    let progress = use_progress();

    view! {
        <Show when=move || progress.is_active()>
            <div class="fixed top-0 left-0 right-0 z-50">
                <progress class="progress progress-primary w-full h-1"></progress>
            </div>
        </Show>
    }
}
