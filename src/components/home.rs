//! 首页：发推框 + 公共时间线

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::tweet::{TweetCard, TweetComposer};
use crate::api::{Api, tweet, use_api};
use crate::models::{TweetForm, TweetWithUser, TweetsList};

/// 时间线分页状态
///
/// 首屏不带查询参数，"加载更多"从第 2 页起显式翻页。
#[derive(Clone, Copy)]
struct Timeline {
    tweets: RwSignal<Vec<TweetWithUser>>,
    next_page: RwSignal<u32>,
    has_more: RwSignal<bool>,
    loading: RwSignal<bool>,
}

impl Timeline {
    fn new() -> Self {
        Self {
            tweets: RwSignal::new(Vec::new()),
            next_page: RwSignal::new(2),
            has_more: RwSignal::new(false),
            loading: RwSignal::new(false),
        }
    }

    /// 重新加载首屏
    fn reload(self, api: Api) {
        self.loading.set(true);
        spawn_local(async move {
            if let Ok(list) = api.json::<TweetsList>(tweet::get_tweets(None)).await {
                self.tweets.set(list.tweets);
                self.next_page.set(list.page + 1);
                self.has_more.set(list.has_more);
            }
            self.loading.set(false);
        });
    }

    /// 追加下一页
    fn load_more(self, api: Api) {
        if self.loading.get_untracked() {
            return;
        }
        self.loading.set(true);
        spawn_local(async move {
            let page = self.next_page.get_untracked();
            if let Ok(list) = api.json::<TweetsList>(tweet::get_tweets(Some(page))).await {
                self.tweets.update(|all| all.extend(list.tweets));
                self.next_page.set(list.page + 1);
                self.has_more.set(list.has_more);
            }
            self.loading.set(false);
        });
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let timeline = Timeline::new();

    timeline.reload(api.clone());

    let on_post = {
        let api = api.clone();
        Callback::new(move |form: TweetForm| {
            let api = api.clone();
            spawn_local(async move {
                if api.send(tweet::create_tweet(&form)).await.is_ok() {
                    timeline.reload(api);
                }
            });
        })
    };

    let on_deleted = Callback::new(move |deleted: u64| {
        timeline.tweets.update(|all| all.retain(|t| t.id != deleted));
    });

    let load_more = {
        let api = api.clone();
        move |_| timeline.load_more(api.clone())
    };

    view! {
        <div class="space-y-4">
            <TweetComposer
                placeholder="What is happening?"
                button="Tweet"
                on_submit=on_post
            />

            <For
                each=move || timeline.tweets.get()
                key=|t| t.id
                children=move |t| view! { <TweetCard tweet=t on_deleted=on_deleted /> }
            />

            <Show when=move || timeline.loading.get() && timeline.tweets.get().is_empty()>
                <div class="text-center py-8">
                    <span class="loading loading-spinner loading-md"></span>
                </div>
            </Show>

            <Show when=move || timeline.has_more.get()>
                <div class="text-center">
                    <button class="btn btn-ghost btn-sm" on:click=load_more.clone()>
                        "Load more"
                    </button>
                </div>
            </Show>
        </div>
    }
}
