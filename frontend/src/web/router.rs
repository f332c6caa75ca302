//! 路由服务模块 - 浏览器适配
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程（守卫 -> 加载 -> 提交 -> 挂载）由 `lingua_shared::Navigator` 执行。

use leptos::prelude::*;
use leptos::task::spawn_local;
use lingua_shared::{AppConfig, HistoryAction, HistoryMode, Mounted, NavigationHost, Navigator};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use super::route::Page;
use super::storage::BrowserStorage;

pub type AppNavigator = Navigator<BrowserStorage, Page, BrowserHost>;

/// 获取当前浏览器地址（路径 + query + hash）
fn current_location() -> String {
    web_sys::window()
        .and_then(|w| {
            let location = w.location();
            let path = location.pathname().ok()?;
            let search = location.search().unwrap_or_default();
            let hash = location.hash().unwrap_or_default();
            Some(format!("{}{}{}", path, search, hash))
        })
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

// ============================================================================
// 宿主实现
// ============================================================================

/// 浏览器导航宿主
///
/// 把应用内路径映射到带 base 的 URL，并通过 Signal 驱动界面更新。
pub struct BrowserHost {
    config: AppConfig,
    mounted: RwSignal<Option<Mounted<Page>>>,
}

impl BrowserHost {
    pub fn new(config: AppConfig, mounted: RwSignal<Option<Mounted<Page>>>) -> Self {
        Self { config, mounted }
    }

    /// 应用内路径对应的完整 URL（带 base）
    pub fn href(&self, path: &str) -> String {
        self.config.with_base(path)
    }

    /// 当前地址对应的应用内位置
    fn app_location(&self) -> String {
        self.config.strip_base(&current_location())
    }
}

impl NavigationHost<Page> for BrowserHost {
    fn commit(&self, location: &str, action: HistoryAction) {
        let url = self.href(location);
        match action {
            HistoryAction::Push => push_history_state(&url),
            HistoryAction::Replace => replace_history_state(&url),
        }
    }

    fn mount(&self, mounted: Mounted<Page>) {
        self.mounted.set(Some(mounted));
    }
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 通过注入的认证信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    navigator: StoredValue<Rc<AppNavigator>, LocalStorage>,
    mounted: RwSignal<Option<Mounted<Page>>>,
}

impl RouterService {
    fn new(navigator: Rc<AppNavigator>, mounted: RwSignal<Option<Mounted<Page>>>) -> Self {
        Self {
            navigator: StoredValue::new_local(navigator),
            mounted,
        }
    }

    /// 当前挂载的视图
    pub fn mounted(&self) -> ReadSignal<Option<Mounted<Page>>> {
        self.mounted.read_only()
    }

    /// 应用内路径的 href（供新标签页打开等浏览器原生行为使用）
    pub fn href(&self, path: &str) -> String {
        self.navigator.with_value(|nav| nav.host().href(path))
    }

    /// 导航到应用内路径（压入 History）
    pub fn navigate(&self, path: &str) {
        self.navigate_with(path.to_string(), HistoryMode::Push);
    }

    fn navigate_with(&self, location: String, mode: HistoryMode) {
        let navigator = self.navigator.get_value();
        spawn_local(async move {
            navigator.navigate(&location, mode).await;
        });
    }

    /// 首次加载：以当前地址替换 History
    fn start(&self) {
        let location = self.navigator.with_value(|nav| nav.host().app_location());
        self.navigate_with(location, HistoryMode::Replace);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let location = router.navigator.with_value(|nav| nav.host().app_location());
            log::debug!("[Router] popstate -> {}", location);
            // popstate 时也执行守卫逻辑
            router.navigate_with(location, HistoryMode::Traverse);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 用户注销时对当前位置重新执行守卫，受保护页面会被替换为登录页。
    fn setup_auth_redirect(&self, is_authenticated: Signal<bool>) {
        let router = *self;

        Effect::new(move |previous: Option<bool>| {
            let is_auth = is_authenticated.get();
            if previous == Some(true) && !is_auth {
                log::info!("[Router] Auth state changed: logged out, re-checking current route.");
                let navigator = router.navigator.get_value();
                spawn_local(async move {
                    navigator.reevaluate().await;
                });
            }
            is_auth
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    navigator: Rc<AppNavigator>,
    mounted: RwSignal<Option<Mounted<Page>>>,
    is_authenticated: Signal<bool>,
) -> RouterService {
    let router = RouterService::new(navigator, mounted);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect(is_authenticated);

    provide_context(router);
    router.start();
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 导航服务
    navigator: Rc<AppNavigator>,
    /// 挂载视图信号，由 BrowserHost 写入
    mounted: RwSignal<Option<Mounted<Page>>>,
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(navigator, mounted, is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前挂载状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前挂载状态，返回对应视图
    matcher: fn(Option<Mounted<Page>>) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.mounted().get())
}

/// 客户端导航链接
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let href = router.href(&to);
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
