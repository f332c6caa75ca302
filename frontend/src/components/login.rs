use crate::auth::{login, use_auth};
use crate::components::sign_in_button::GoogleSignInButton;
use crate::config::use_config;
use crate::web::route::CHATBOT_PATH;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use lingua_shared::IdentityEvent;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let config = use_config();
    let navigate = use_navigate();
    let is_authenticated = auth.is_authenticated_signal();

    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // Redirect if already authenticated
    Effect::new({
        let navigate = navigate.clone();
        move |_| {
            if is_authenticated.get() {
                navigate(CHATBOT_PATH);
            }
        }
    });

    let on_event = Callback::new(move |event: IdentityEvent| {
        let failure = match &event {
            IdentityEvent::Failed(reason) => Some(reason.clone()),
            _ => None,
        };
        if login(&auth, event) {
            set_error_msg.set(None);
        } else {
            set_error_msg.set(Some(
                failure.unwrap_or_else(|| "Sign-in failed. Please try again.".to_string()),
            ));
        }
    });

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Lingua"</h1>
                    <p class="text-base-content/70">"Sign in to continue to the chatbot"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body items-center">
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <GoogleSignInButton client_id=config.client_id().to_string() on_event=on_event />
                    </div>
                </div>
            </div>
        </div>
    }
}
