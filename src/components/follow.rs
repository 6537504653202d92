//! 关注列表页：某用户的粉丝 / 关注两个标签

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::user::UserCard;
use crate::api::{use_api, user};
use crate::models::{User, UsersList};
use crate::web::route::FollowTab;
use crate::web::router::Link;

#[component]
pub fn FollowPage(user_name: String, tab: FollowTab) -> impl IntoView {
    let api = use_api();

    let subject = RwSignal::new(Option::<User>::None);
    let users = RwSignal::new(Vec::<User>::new());
    let has_more = RwSignal::new(false);
    let next_page = RwSignal::new(2u32);

    let list_request = move |user_id: &str, page: Option<u32>| match tab {
        FollowTab::Followers => user::get_followers(user_id, page),
        FollowTab::Following => user::get_following(user_id, page),
    };

    {
        let api = api.clone();
        let user_name = user_name.clone();
        spawn_local(async move {
            let Ok(found) = api.json::<User>(user::get_user_by_name(&user_name)).await else {
                return;
            };
            let user_id = found.user_id.clone();
            subject.set(Some(found));

            if let Ok(list) = api.json::<UsersList>(list_request(&user_id, None)).await {
                users.set(list.users);
                next_page.set(list.page + 1);
                has_more.set(list.has_more);
            }
        });
    }

    let load_more = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            let Some(found) = subject.get_untracked() else {
                return;
            };
            spawn_local(async move {
                let page = next_page.get_untracked();
                if let Ok(list) = api
                    .json::<UsersList>(list_request(&found.user_id, Some(page)))
                    .await
                {
                    users.update(|all| all.extend(list.users));
                    next_page.set(list.page + 1);
                    has_more.set(list.has_more);
                }
            });
        }
    };

    let heading = move || {
        subject.with(|subject| {
            subject
                .as_ref()
                .map(|found| match tab {
                    FollowTab::Followers => format!("People following @{}", found.user_name),
                    FollowTab::Following => format!("People @{} follows", found.user_name),
                })
                .unwrap_or_default()
        })
    };

    let tab_class = |active: bool| if active { "tab tab-active" } else { "tab" };

    view! {
        <div class="space-y-4">
            <h2 class="text-lg font-bold">{heading}</h2>

            <div role="tablist" class="tabs tabs-bordered">
                <Link
                    to=format!("/{}/followers", user_name.clone())
                    class=tab_class(tab == FollowTab::Followers)
                >
                    "Followers"
                </Link>
                <Link
                    to=format!("/{}/following", user_name.clone())
                    class=tab_class(tab == FollowTab::Following)
                >
                    "Following"
                </Link>
            </div>

            <For
                each=move || users.get()
                key=|u| u.user_id.clone()
                children=move |u| view! { <UserCard user=u /> }
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
