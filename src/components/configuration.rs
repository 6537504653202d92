//! 设置页：个人资料编辑与用户管理（管理员）

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_api, user};
use crate::models::{UpdateUserForm, User, UsersList};
use crate::store::use_store;
use crate::web::route::{AppRoute, ConfigSection};
use crate::web::router::Link;

#[component]
pub fn ConfigurationPage(section: ConfigSection) -> impl IntoView {
    let store = use_store();

    let is_admin = {
        let user = store.user;
        move || user.with(|user| user.role.as_deref() == Some("admin"))
    };

    let tab_class = |active: bool| if active { "tab tab-active" } else { "tab" };

    view! {
        <div class="space-y-4">
            <div role="tablist" class="tabs tabs-bordered">
                <Link
                    to=AppRoute::Configuration(ConfigSection::Profile).to_path()
                    class=tab_class(section == ConfigSection::Profile)
                >
                    "Profile"
                </Link>
                <Show when=is_admin.clone()>
                    <Link
                        to=AppRoute::Configuration(ConfigSection::Users).to_path()
                        class=tab_class(section == ConfigSection::Users)
                    >
                        "Users"
                    </Link>
                </Show>
            </div>

            {match section {
                ConfigSection::Profile => view! { <ProfileSection /> }.into_any(),
                ConfigSection::Users => view! { <UsersSection /> }.into_any(),
            }}
        </div>
    }
}

/// 个人资料编辑表单
#[component]
fn ProfileSection() -> impl IntoView {
    let store = use_store();
    let api = use_api();

    let current = store.user.get_untracked();
    let (user_name, set_user_name) = signal(current.user_name.clone());
    let (name, set_name) = signal(current.name.clone());
    let (email, set_email) = signal(current.email.clone());
    let (about, set_about) = signal(current.about.clone().unwrap_or_default());
    let (country, set_country) = signal(current.country.clone().unwrap_or_default());
    let (saved, set_saved) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_saved.set(false);

        let store = store.clone();
        let api = api.clone();
        spawn_local(async move {
            let me_id = store.user.with_untracked(|user| user.user_id.clone());
            let opt = |value: String| if value.is_empty() { None } else { Some(value) };
            let form = UpdateUserForm {
                user_name: user_name.get_untracked(),
                name: name.get_untracked(),
                email: email.get_untracked(),
                about: opt(about.get_untracked()),
                country: opt(country.get_untracked()),
                ..Default::default()
            };
            if let Ok(updated) = api.json::<User>(user::update_user(&me_id, &form)).await {
                store.update_user_info(updated);
                set_saved.set(true);
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body gap-3">
                <h3 class="card-title">"Edit profile"</h3>

                <Show when=move || saved.get()>
                    <div role="alert" class="alert alert-success text-sm py-2">
                        <span>"Profile updated."</span>
                    </div>
                </Show>

                <div class="form-control">
                    <label class="label"><span class="label-text">"Username"</span></label>
                    <input
                        type="text"
                        class="input input-bordered"
                        on:input=move |ev| set_user_name.set(event_target_value(&ev))
                        prop:value=user_name
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Name"</span></label>
                    <input
                        type="text"
                        class="input input-bordered"
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        prop:value=name
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Email"</span></label>
                    <input
                        type="email"
                        class="input input-bordered"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"About"</span></label>
                    <textarea
                        class="textarea textarea-bordered"
                        rows="2"
                        on:input=move |ev| set_about.set(event_target_value(&ev))
                        prop:value=about
                    ></textarea>
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Country"</span></label>
                    <input
                        type="text"
                        class="input input-bordered"
                        on:input=move |ev| set_country.set(event_target_value(&ev))
                        prop:value=country
                    />
                </div>

                <div class="card-actions justify-end mt-2">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Save"
                    </button>
                </div>
            </div>
        </form>
    }
}

/// 用户管理表格（后端对非管理员返回 403）
#[component]
fn UsersSection() -> impl IntoView {
    let api = use_api();

    let users = RwSignal::new(Vec::<User>::new());
    let has_more = RwSignal::new(false);
    let next_page = RwSignal::new(2u32);

    {
        let api = api.clone();
        spawn_local(async move {
            if let Ok(list) = api.json::<UsersList>(user::get_all_users(None)).await {
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
            spawn_local(async move {
                let page = next_page.get_untracked();
                if let Ok(list) = api
                    .json::<UsersList>(user::get_all_users(Some(page)))
                    .await
                {
                    users.update(|all| all.extend(list.users));
                    next_page.set(list.page + 1);
                    has_more.set(list.has_more);
                }
            });
        }
    };

    let on_role_change = {
        let api = api.clone();
        move |user_id: String, role: String| {
            let api = api.clone();
            spawn_local(async move {
                if api
                    .send(user::update_user_role(&user_id, &role))
                    .await
                    .is_ok()
                {
                    users.update(|all| {
                        if let Some(found) = all.iter_mut().find(|u| u.user_id == user_id) {
                            found.role = Some(role);
                        }
                    });
                }
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        move |user_id: String| {
            let api = api.clone();
            spawn_local(async move {
                if api.send(user::delete_user(&user_id)).await.is_ok() {
                    users.update(|all| all.retain(|u| u.user_id != user_id));
                }
            });
        }
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-0">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Username"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || users.get()
                                key=|u| u.user_id.clone()
                                children={
                                    let on_role_change = on_role_change.clone();
                                    let on_delete = on_delete.clone();
                                    move |u| {
                                        let role_id = u.user_id.clone();
                                        let delete_id = u.user_id.clone();
                                        let on_role_change = on_role_change.clone();
                                        let on_delete = on_delete.clone();
                                        let role = u.role.clone().unwrap_or_else(|| "user".to_string());
                                        view! {
                                            <tr>
                                                <td class="font-mono">{format!("@{}", u.user_name)}</td>
                                                <td>{u.email.clone()}</td>
                                                <td>
                                                    <select
                                                        class="select select-bordered select-xs"
                                                        on:change=move |ev| {
                                                            on_role_change(role_id.clone(), event_target_value(&ev))
                                                        }
                                                    >
                                                        <option value="user" selected=role == "user">"user"</option>
                                                        <option value="admin" selected=role == "admin">"admin"</option>
                                                    </select>
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-xs text-error"
                                                        on:click=move |_| on_delete(delete_id.clone())
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <Show when=move || has_more.get()>
                    <div class="text-center pb-4">
                        <button class="btn btn-ghost btn-sm" on:click=load_more.clone()>
                            "Load more"
                        </button>
                    </div>
                </Show>
            </div>
        </div>
    }
}
