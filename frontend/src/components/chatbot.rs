use crate::auth::{logout, use_auth};
use crate::web::route::HOME_PATH;
use crate::web::router::Link;
use leptos::prelude::*;

/// 聊天页面（受保护，延迟加载）
///
/// 对话服务属于外部后端，此页面只负责受保护区域的外壳。
#[component]
pub fn ChatbotPage() -> impl IntoView {
    let auth = use_auth();

    // 注销后路由服务会重新执行守卫并跳转到登录页
    let on_logout = move |_| {
        logout(&auth);
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-4xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to=HOME_PATH class="btn btn-ghost text-xl">"Lingua"</Link>
                    </div>
                    <div class="flex-none gap-2">
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            "Sign out"
                        </button>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Chatbot"</h3>
                        <p class="text-base-content/70 text-sm">
                            "You are signed in. Start a conversation to practice."
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}
