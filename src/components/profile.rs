//! 当前用户的资料页：资料卡 + 推文 / 点赞两个标签页

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::tweet::TweetCard;
use crate::api::{use_api, user};
use crate::models::{TweetWithUser, TweetsList};
use crate::store::use_store;
use crate::web::route::{AppRoute, ConfigSection};
use crate::web::router::Link;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ProfileTab {
    Tweets,
    Likes,
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let store = use_store();
    let api = use_api();

    let me = store.user;
    // 守卫保证进入此页时用户记录已加载
    let handle = me.with_untracked(|u| u.user_name.clone());
    let (tab, set_tab) = signal(ProfileTab::Tweets);
    let tweets = RwSignal::new(Vec::<TweetWithUser>::new());

    // 标签切换即重新拉取对应列表
    Effect::new({
        let api = api.clone();
        move |_| {
            let api = api.clone();
            let current = tab.get();
            let me_id = me.with_untracked(|user| user.user_id.clone());
            if me_id.is_empty() {
                return;
            }
            spawn_local(async move {
                let request = match current {
                    ProfileTab::Tweets => user::get_tweets_by_user_id(&me_id, None),
                    ProfileTab::Likes => user::get_liked_tweets(&me_id, None),
                };
                if let Ok(list) = api.json::<TweetsList>(request).await {
                    tweets.set(list.tweets);
                }
            });
        }
    });

    let on_deleted = Callback::new(move |deleted: u64| {
        tweets.update(|all| all.retain(|t| t.id != deleted));
    });

    let tab_class = move |this: ProfileTab| {
        if tab.get() == this {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="space-y-4">
            <div class="card bg-base-100 shadow">
                <div class="card-body p-4 gap-2">
                    <div class="flex items-center gap-3">
                        <div class="avatar placeholder">
                            <div class="bg-neutral text-neutral-content rounded-full w-14">
                                <span class="text-xl">
                                    {move || me.with(|u| u.name.chars().next().unwrap_or('?').to_string())}
                                </span>
                            </div>
                        </div>
                        <div class="flex flex-col">
                            <span class="text-xl font-bold">{move || me.with(|u| u.name.clone())}</span>
                            <span class="text-base-content/60">
                                {move || me.with(|u| format!("@{}", u.user_name))}
                            </span>
                        </div>
                        <Link
                            to=AppRoute::Configuration(ConfigSection::Profile).to_path()
                            class="btn btn-outline btn-sm ml-auto"
                        >
                            "Edit profile"
                        </Link>
                    </div>
                    <p class="text-base-content/80">
                        {move || me.with(|u| u.about.clone().unwrap_or_default())}
                    </p>
                    <div class="flex gap-4 text-sm">
                        <Link
                            to=format!("/{}/followers", handle)
                            class="link link-hover"
                        >
                            {move || me.with(|u| u.followers.unwrap_or(0))} " Followers"
                        </Link>
                        <Link
                            to=format!("/{}/following", handle)
                            class="link link-hover"
                        >
                            {move || me.with(|u| u.following.unwrap_or(0))} " Following"
                        </Link>
                    </div>
                </div>
            </div>

            <div role="tablist" class="tabs tabs-bordered">
                <a role="tab" class=move || tab_class(ProfileTab::Tweets)
                    on:click=move |_| set_tab.set(ProfileTab::Tweets)>
                    "Tweets"
                </a>
                <a role="tab" class=move || tab_class(ProfileTab::Likes)
                    on:click=move |_| set_tab.set(ProfileTab::Likes)>
                    "Likes"
                </a>
            </div>

            <For
                each=move || tweets.get()
                key=|t| t.id
                children=move |t| view! { <TweetCard tweet=t on_deleted=on_deleted /> }
            />
        </div>
    }
}
