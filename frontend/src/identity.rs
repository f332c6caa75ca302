//! Google Identity Services 绑定
//!
//! 页面需先加载 `https://accounts.google.com/gsi/client`。
//! 凭据内容不做任何校验，只转换为 [`IdentityEvent`]。

use js_sys::{Object, Reflect};
use lingua_shared::{Credential, IdentityEvent};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize, catch)]
    fn gsi_initialize(config: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton, catch)]
    fn gsi_render_button(parent: &web_sys::HtmlElement, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = disableAutoSelect, catch)]
    fn gsi_disable_auto_select() -> Result<(), JsValue>;
}

/// 初始化 Google Sign-In 并在 `parent` 中渲染登录按钮
///
/// # Arguments
/// * `parent` - 按钮容器
/// * `client_id` - OAuth client id
/// * `on_event` - 每次提供方回调时触发
pub fn render_sign_in_button(
    parent: &web_sys::HtmlElement,
    client_id: &str,
    on_event: impl Fn(IdentityEvent) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
        on_event(credential_event(&response));
    });

    let config = Object::new();
    Reflect::set(&config, &"client_id".into(), &client_id.into())?;
    Reflect::set(&config, &"callback".into(), callback.as_ref())?;
    gsi_initialize(&config)?;

    // 回调在整个页面生命周期内有效
    callback.forget();

    let options = Object::new();
    Reflect::set(&options, &"theme".into(), &"outline".into())?;
    Reflect::set(&options, &"size".into(), &"large".into())?;
    gsi_render_button(parent, &options)
}

/// 注销时禁止一键自动登录
pub fn disable_auto_select() {
    if let Err(e) = gsi_disable_auto_select() {
        log::warn!("[Identity] disableAutoSelect failed: {:?}", e);
    }
}

fn credential_event(response: &JsValue) -> IdentityEvent {
    let credential = Reflect::get(response, &JsValue::from_str("credential"))
        .ok()
        .and_then(|value| value.as_string());

    match credential {
        Some(raw) => IdentityEvent::SignedIn(Credential::new(raw)),
        None => IdentityEvent::Failed("sign-in response carried no credential".to_string()),
    }
}
