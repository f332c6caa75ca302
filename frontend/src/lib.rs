//! Lingua 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义
//! - `web::router`: 路由服务（浏览器 History 适配）
//! - `auth`: 认证状态管理
//! - `identity`: Google Identity Services 绑定
//! - `components`: UI 组件层
//!
//! 守卫、会话存储与路由表本身位于 `lingua_shared`。

mod auth;
mod components {
    pub mod chatbot;
    pub mod home;
    pub mod login;
    mod sign_in_button;
}
mod config;
mod identity;

use crate::auth::AuthContext;

use leptos::prelude::*;
use lingua_shared::{AppConfig, ConfigError, Guard, Mounted, NavigationTable, Navigator, SessionStore};
use std::rc::Rc;

// 浏览器 API 适配模块
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::BrowserStorage;
}

use web::BrowserStorage;
use web::route::Page;
use web::router::{BrowserHost, Router, RouterOutlet};

/// 启动结果：已校验的配置、路由表与已恢复的会话
pub struct Shell {
    config: AppConfig,
    table: NavigationTable<Page>,
    session: SessionStore<BrowserStorage>,
}

/// 启动应用
///
/// 读取配置 -> 恢复会话 -> 定义路由表。任何 `ConfigError` 都会阻止应用挂载。
pub fn boot() -> Result<Shell, ConfigError> {
    let config = config::load_config()?;

    // 会话只在这里恢复一次，早于任何守卫决策
    let session = SessionStore::new(BrowserStorage);
    session.restore();

    let table = web::route::app_routes()?;

    Ok(Shell {
        config,
        table,
        session,
    })
}

/// 路由匹配函数
///
/// 根据挂载状态返回对应的视图组件。
fn route_matcher(mounted: Option<Mounted<Page>>) -> AnyView {
    match mounted {
        Some(Mounted::Route { view, .. }) => view(),
        Some(Mounted::NotFound { .. }) => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
        None => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App(shell: Shell) -> impl IntoView {
    let Shell {
        config,
        table,
        session,
    } = shell;
    let session = Rc::new(session);

    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new(Rc::clone(&session));
    provide_context(auth_ctx);
    provide_context(config.clone());

    // 2. 组装导航服务：守卫只读取会话存储
    let mounted = RwSignal::new(None);
    let guard = Guard::new(session, Rc::new(table));
    let navigator = Rc::new(Navigator::new(guard, BrowserHost::new(config, mounted)));

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：首次导航同样经过守卫
        <Router navigator=navigator mounted=mounted is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

/// 启动失败时显示的静态页面
#[component]
pub fn BootFailure(
    /// 失败原因
    reason: String,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div role="alert" class="alert alert-error max-w-lg">
                <span>"Lingua could not start: " {reason}</span>
            </div>
        </div>
    }
}
