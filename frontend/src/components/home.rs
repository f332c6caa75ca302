use crate::auth::use_auth;
use crate::web::route::{CHATBOT_PATH, LOGIN_PATH};
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let is_authenticated = use_auth().is_authenticated_signal();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-6">
                    <h1 class="text-5xl font-bold">"Lingua"</h1>
                    <p class="text-base-content/70">
                        "Practice a new language with a conversational tutor."
                    </p>
                    <div class="flex justify-center gap-2">
                        <Link to=CHATBOT_PATH class="btn btn-primary">"Open chatbot"</Link>
                        <Show when=move || !is_authenticated.get()>
                            <Link to=LOGIN_PATH class="btn btn-ghost">"Sign in"</Link>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}
