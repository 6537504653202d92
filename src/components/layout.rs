//! 已登录页面的外壳：导航栏 + 内容区

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_api, user};
use crate::store::use_store;
use crate::web::route::{AppRoute, ConfigSection};
use crate::web::router::{Link, use_router};

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let store = use_store();
    let api = use_api();
    let router = use_router();

    let user = store.user;
    let user_name = move || user.with(|user| user.user_name.clone());
    let is_admin = move || user.with(|user| user.role.as_deref() == Some("admin"));

    let on_logout = move |_| {
        let store = store.clone();
        let api = api.clone();
        let router = router.clone();
        spawn_local(async move {
            // 后端注销失败不阻止本地清理
            let _ = api.send(user::logout()).await;
            store.remove_user_info();
            router.replace(AppRoute::Login);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Link to="/home" class="btn btn-ghost text-xl">"Twitter"</Link>
                </div>
                <div class="flex-none gap-1">
                    <Link to="/home" class="btn btn-ghost btn-sm">"Home"</Link>
                    <Link to="/profile" class="btn btn-ghost btn-sm">{user_name}</Link>
                    <Link
                        to=AppRoute::Configuration(ConfigSection::Profile).to_path()
                        class="btn btn-ghost btn-sm"
                    >
                        "Settings"
                    </Link>
                    <Show when=is_admin>
                        <Link
                            to=AppRoute::Configuration(ConfigSection::Users).to_path()
                            class="btn btn-ghost btn-sm"
                        >
                            "Users"
                        </Link>
                    </Show>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "Log out"
                    </button>
                </div>
            </div>
            <main class="max-w-2xl mx-auto p-4 space-y-4">{children()}</main>
        </div>
    }
}
