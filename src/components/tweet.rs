//! 推文相关组件：卡片、编辑框与详情页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{tweet, use_api, user};
use crate::models::{TweetForm, TweetWithUser};
use crate::store::use_store;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 发推/回复编辑框
#[component]
pub fn TweetComposer(
    /// 输入框占位文案
    #[prop(into)] placeholder: String,
    /// 提交按钮文案
    #[prop(into)] button: String,
    /// 提交成功后的回调（由父组件刷新列表）
    on_submit: Callback<TweetForm>,
) -> impl IntoView {
    let (text, set_text) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let body = text.get();
        if body.trim().is_empty() {
            return;
        }
        set_is_submitting.set(true);
        on_submit.run(TweetForm {
            text: body,
            image: None,
        });
        set_text.set(String::new());
        set_is_submitting.set(false);
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=submit>
            <div class="card-body p-4 gap-2">
                <textarea
                    class="textarea textarea-bordered w-full"
                    rows="3"
                    placeholder=placeholder
                    on:input=move |ev| set_text.set(event_target_value(&ev))
                    prop:value=text
                ></textarea>
                <div class="card-actions justify-end">
                    <button
                        class="btn btn-primary btn-sm"
                        disabled=move || is_submitting.get() || text.get().trim().is_empty()
                    >
                        {button}
                    </button>
                </div>
            </div>
        </form>
    }
}

/// 单条推文卡片
///
/// 点赞状态在本地乐观回显；删除按钮只对作者与管理员可见，
/// 成功后经回调通知父组件摘除。
#[component]
pub fn TweetCard(
    tweet: TweetWithUser,
    #[prop(into, optional)] on_deleted: Option<Callback<u64>>,
) -> impl IntoView {
    let store = use_store();
    let api = use_api();

    let me = store.user;
    let tweet_id = tweet.id;
    let author_id = tweet.user_id;
    let author_name = tweet.user_name;
    let display_name = tweet.name;
    let text = tweet.text;
    let image = tweet.image;
    let created_at = tweet.created_at;
    let replys = tweet.replys;

    let (likes, set_likes) = signal(tweet.likes);
    let (liked, set_liked) = signal(tweet.already_liked);

    let can_delete = {
        let author_id = author_id.clone();
        move || {
            me.with(|user| {
                user.user_id == author_id || user.role.as_deref() == Some("admin")
            })
        }
    };

    let on_like = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move {
                let me_id = me.with_untracked(|user| user.user_id.clone());
                if liked.get_untracked() {
                    if api.send(user::delete_like(&me_id, tweet_id)).await.is_ok() {
                        set_liked.set(false);
                        set_likes.update(|n| *n -= 1);
                    }
                } else if api.send(user::like_tweet(&me_id, tweet_id)).await.is_ok() {
                    set_liked.set(true);
                    set_likes.update(|n| *n += 1);
                }
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move {
                if api.send(tweet::delete_tweet(tweet_id)).await.is_ok()
                    && let Some(on_deleted) = on_deleted
                {
                    on_deleted.run(tweet_id);
                }
            });
        }
    };

    let detail_path = format!("/{}/status/{}", author_name, tweet_id);
    let initial = display_name.chars().next().unwrap_or('?').to_string();
    let image_src = image.clone().unwrap_or_default();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4 gap-2">
                <div class="flex items-center gap-2">
                    <div class="avatar placeholder">
                        <div class="bg-neutral text-neutral-content rounded-full w-10">
                            <span>{initial}</span>
                        </div>
                    </div>
                    <div class="flex flex-col">
                        <span class="font-bold">{display_name}</span>
                        <Link to=format!("/{}", author_name.clone()) class="text-sm text-base-content/60 link link-hover">
                            {format!("@{}", author_name)}
                        </Link>
                    </div>
                    <span class="ml-auto text-xs text-base-content/50">{created_at}</span>
                </div>

                <Link to=detail_path class="whitespace-pre-wrap text-left">
                    {text}
                </Link>
                <Show when=move || image.is_some()>
                    <img class="rounded-box max-h-96 object-cover" src=image_src.clone() />
                </Show>

                <div class="card-actions items-center gap-4 text-sm text-base-content/60">
                    <span>{replys} " replies"</span>
                    <button
                        class=move || if liked.get() { "btn btn-ghost btn-xs text-error" } else { "btn btn-ghost btn-xs" }
                        on:click=on_like
                    >
                        {move || likes.get()} " likes"
                    </button>
                    <Show when=can_delete.clone()>
                        <button class="btn btn-ghost btn-xs text-error ml-auto" on:click=on_delete.clone()>
                            "Delete"
                        </button>
                    </Show>
                </div>
            </div>
        </div>
    }
}

/// 推文详情页：原文 + 回复列表 + 回复框
#[component]
pub fn TweetPage(user_name: String, tweet_id: String) -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let id: Option<u64> = tweet_id.parse().ok();
    let heading = format!("Tweet by @{}", user_name);

    let (detail, set_detail) = signal(Option::<TweetWithUser>::None);
    let (replies, set_replies) = signal(Vec::<TweetWithUser>::new());

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            let Some(id) = id else { return };
            spawn_local(async move {
                if let Ok(found) = api.json::<TweetWithUser>(tweet::get_tweet_by_id(id)).await {
                    set_detail.set(Some(found));
                }
                if let Ok(list) = api
                    .json::<crate::models::TweetsList>(tweet::get_reply_tweets(id))
                    .await
                {
                    set_replies.set(list.tweets);
                }
            });
        }
    };
    load();

    let on_reply = {
        let api = api.clone();
        let load = load.clone();
        Callback::new(move |form: TweetForm| {
            let api = api.clone();
            let load = load.clone();
            let Some(id) = id else { return };
            spawn_local(async move {
                if api.send(tweet::create_reply_tweet(id, &form)).await.is_ok() {
                    load();
                }
            });
        })
    };

    let on_main_deleted = {
        let router = router.clone();
        Callback::new(move |_: u64| {
            router.push(AppRoute::Home);
        })
    };

    let on_reply_deleted = Callback::new(move |deleted: u64| {
        set_replies.update(|list| list.retain(|reply| reply.id != deleted));
    });

    view! {
        <div class="space-y-4">
            <h2 class="text-lg font-bold">{heading}</h2>
            <Show
                when=move || detail.get().is_some()
                fallback=|| view! {
                    <div class="text-center py-8">
                        <span class="loading loading-spinner loading-md"></span>
                    </div>
                }
            >
                <TweetCard tweet=detail.get().unwrap() on_deleted=on_main_deleted />
            </Show>

            <TweetComposer
                placeholder="Tweet your reply"
                button="Reply"
                on_submit=on_reply
            />

            <For
                each=move || replies.get()
                key=|reply| reply.id
                children=move |reply| {
                    view! { <TweetCard tweet=reply on_deleted=on_reply_deleted /> }
                }
            />
        </div>
    }
}
