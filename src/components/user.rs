//! 用户页与用户列表行组件

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::tweet::TweetCard;
use crate::api::{use_api, user};
use crate::models::{TweetWithUser, TweetsList, User};
use crate::store::use_store;
use crate::web::router::Link;

/// 用户列表行（关注列表、用户管理等处复用）
#[component]
pub fn UserCard(user: User) -> impl IntoView {
    let initial = user.name.chars().next().unwrap_or('?').to_string();
    let about = user.about.clone().unwrap_or_default();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4 flex-row items-center gap-3">
                <div class="avatar placeholder">
                    <div class="bg-neutral text-neutral-content rounded-full w-10">
                        <span>{initial}</span>
                    </div>
                </div>
                <div class="flex flex-col">
                    <span class="font-bold">{user.name.clone()}</span>
                    <Link
                        to=format!("/{}", user.user_name.clone())
                        class="text-sm text-base-content/60 link link-hover"
                    >
                        {format!("@{}", user.user_name)}
                    </Link>
                </div>
                <span class="ml-auto text-sm text-base-content/60 truncate max-w-48">{about}</span>
            </div>
        </div>
    }
}

/// 他人用户页：资料卡 + 关注按钮 + 其推文
///
/// 访问自己的用户名时守卫已改投 `/profile`，这里无需再判断。
#[component]
pub fn UserPage(user_name: String) -> impl IntoView {
    let store = use_store();
    let api = use_api();

    let profile = RwSignal::new(Option::<User>::None);
    let tweets = RwSignal::new(Vec::<TweetWithUser>::new());
    let has_more = RwSignal::new(false);
    let next_page = RwSignal::new(2u32);

    {
        let api = api.clone();
        let user_name = user_name.clone();
        spawn_local(async move {
            let Ok(found) = api.json::<User>(user::get_user_by_name(&user_name)).await else {
                return;
            };
            let user_id = found.user_id.clone();
            profile.set(Some(found));

            if let Ok(list) = api
                .json::<TweetsList>(user::get_tweets_by_user_id(&user_id, None))
                .await
            {
                tweets.set(list.tweets);
                next_page.set(list.page + 1);
                has_more.set(list.has_more);
            }
        });
    }

    let on_follow = {
        let api = api.clone();
        let store = store.clone();
        move |_| {
            let api = api.clone();
            let store = store.clone();
            let Some(them) = profile.get_untracked() else {
                return;
            };
            let me_id = store.user.with_untracked(|user| user.user_id.clone());
            spawn_local(async move {
                let followed = them.is_following.unwrap_or(false);
                let result = if followed {
                    api.send(user::delete_following(&me_id, &them.user_id)).await
                } else {
                    api.send(user::follow(&me_id, &them.user_id)).await
                };
                if result.is_ok() {
                    let delta = if followed { -1 } else { 1 };
                    profile.update(|current| {
                        if let Some(current) = current {
                            current.is_following = Some(!followed);
                            current.followers = Some(current.followers.unwrap_or(0) + delta);
                        }
                    });
                    store.update_user_following(delta);
                }
            });
        }
    };

    let load_more = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            let Some(them) = profile.get_untracked() else {
                return;
            };
            spawn_local(async move {
                let page = next_page.get_untracked();
                if let Ok(list) = api
                    .json::<TweetsList>(user::get_tweets_by_user_id(&them.user_id, Some(page)))
                    .await
                {
                    tweets.update(|all| all.extend(list.tweets));
                    next_page.set(list.page + 1);
                    has_more.set(list.has_more);
                }
            });
        }
    };

    let on_deleted = Callback::new(move |deleted: u64| {
        tweets.update(|all| all.retain(|t| t.id != deleted));
    });

    let handle = user_name.clone();

    view! {
        <div class="space-y-4">
            <Show
                when=move || profile.get().is_some()
                fallback=|| view! {
                    <div class="text-center py-8">
                        <span class="loading loading-spinner loading-md"></span>
                    </div>
                }
            >
                {
                    let handle = handle.clone();
                    let on_follow = on_follow.clone();
                    move || {
                        let them = profile.get().unwrap();
                        let followed = them.is_following.unwrap_or(false);
                        view! {
                            <div class="card bg-base-100 shadow">
                                <div class="card-body p-4 gap-2">
                                    <div class="flex items-center gap-3">
                                        <div class="avatar placeholder">
                                            <div class="bg-neutral text-neutral-content rounded-full w-14">
                                                <span class="text-xl">
                                                    {them.name.chars().next().unwrap_or('?').to_string()}
                                                </span>
                                            </div>
                                        </div>
                                        <div class="flex flex-col">
                                            <span class="text-xl font-bold">{them.name.clone()}</span>
                                            <span class="text-base-content/60">{format!("@{}", them.user_name)}</span>
                                        </div>
                                        <button
                                            class=if followed { "btn btn-outline btn-sm ml-auto" } else { "btn btn-primary btn-sm ml-auto" }
                                            on:click=on_follow.clone()
                                        >
                                            {if followed { "Unfollow" } else { "Follow" }}
                                        </button>
                                    </div>
                                    <p class="text-base-content/80">{them.about.clone().unwrap_or_default()}</p>
                                    <div class="flex gap-4 text-sm">
                                        <Link to=format!("/{}/followers", handle.clone()) class="link link-hover">
                                            {them.followers.unwrap_or(0)} " Followers"
                                        </Link>
                                        <Link to=format!("/{}/following", handle.clone()) class="link link-hover">
                                            {them.following.unwrap_or(0)} " Following"
                                        </Link>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                }
            </Show>

            <For
                each=move || tweets.get()
                key=|t| t.id
                children=move |t| view! { <TweetCard tweet=t on_deleted=on_deleted /> }
            />

            <Show when=move || has_more.get()>
                <div class="text-center">
                    <button class="btn btn-ghost btn-sm" on:click=load_more.clone()>
                        "Load more"
                    </button>
                </div>
            </Show>
        </div>
    }
}
