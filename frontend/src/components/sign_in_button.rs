use crate::identity;
use leptos::html::Div;
use leptos::prelude::*;
use lingua_shared::IdentityEvent;

/// Google 登录按钮
///
/// 容器挂载后由 Google Identity Services 渲染按钮，脚本不可用时显示提示。
#[component]
pub fn GoogleSignInButton(
    /// OAuth client id
    #[prop(into)]
    client_id: String,
    /// 提供方回调
    on_event: Callback<IdentityEvent>,
) -> impl IntoView {
    let container = NodeRef::<Div>::new();
    let (unavailable, set_unavailable) = signal(false);

    // 每次 initialize 都会泄漏一个回调闭包，因此只渲染一次
    Effect::new(move |rendered: Option<bool>| {
        let el = container.get();
        render_once(rendered, el.is_some(), || {
            let Some(el) = el else { return };
            let result =
                identity::render_sign_in_button(&el, &client_id, move |event| on_event.run(event));
            if let Err(e) = result {
                log::error!("[Identity] Failed to render Google Sign-In button: {:?}", e);
                set_unavailable.set(true);
            }
        })
    });

    view! {
        <div class="flex flex-col items-center gap-2">
            <div node_ref=container></div>
            <Show when=move || unavailable.get()>
                <p class="text-sm text-error">"Google Sign-In is unavailable. Check your connection and reload."</p>
            </Show>
        </div>
    }
}

/// 容器就绪后执行一次渲染，返回是否已渲染
fn render_once(rendered: Option<bool>, ready: bool, render: impl FnOnce()) -> bool {
    let rendered = rendered.unwrap_or(false);
    if rendered || !ready {
        return rendered;
    }
    render();
    true
}
