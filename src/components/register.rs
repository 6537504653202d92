use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::models::RegisterForm;
use crate::store::use_store;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = use_store();
    let api = use_api();
    let router = use_router();

    let (user_name, set_user_name) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if user_name.get().is_empty() || email.get().is_empty() || password.get().is_empty() {
            return;
        }

        set_is_submitting.set(true);
        let store = store.clone();
        let api = api.clone();
        let router = router.clone();
        spawn_local(async move {
            let form = RegisterForm {
                user_name: user_name.get_untracked(),
                name: name.get_untracked(),
                email: email.get_untracked(),
                password: password.get_untracked(),
            };
            if store.register(&api, &form).await.is_ok() {
                router.push(AppRoute::Home);
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Join Twitter"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="user_name">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="user_name"
                                type="text"
                                placeholder="jack"
                                on:input=move |ev| set_user_name.set(event_target_value(&ev))
                                prop:value=user_name
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                placeholder="Jack Dorsey"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm mt-2">
                            "Already have an account? " <Link to="/login" class="link link-primary">"Log in"</Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
