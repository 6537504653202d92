//! 403 / 404 兜底页面

use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn ForbiddenPage() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div>
                    <h1 class="text-5xl font-bold">"403"</h1>
                    <p class="py-4 text-base-content/70">
                        "You are not allowed to access this page."
                    </p>
                    <Link to="/home" class="btn btn-primary">"Back to Home"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div>
                    <h1 class="text-5xl font-bold">"404"</h1>
                    <p class="py-4 text-base-content/70">
                        "This page does not exist."
                    </p>
                    <Link to="/home" class="btn btn-primary">"Back to Home"</Link>
                </div>
            </div>
        </div>
    }
}
