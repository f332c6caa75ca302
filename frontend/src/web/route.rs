//! 路由定义模块
//!
//! 定义应用的所有路由及其属性，启动时交给 `NavigationTable::define` 校验。

use leptos::prelude::*;
use lingua_shared::{ConfigError, NavigationTable, RouteEntry, ViewSource};

use crate::components::chatbot::ChatbotPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;

/// 页面渲染函数
pub type Page = fn() -> AnyView;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const CHATBOT_PATH: &str = "/chatbot";

fn home_page() -> AnyView {
    view! { <HomePage /> }.into_any()
}

fn login_page() -> AnyView {
    view! { <LoginPage /> }.into_any()
}

fn chatbot_page() -> AnyView {
    view! { <ChatbotPage /> }.into_any()
}

/// 聊天页面的延迟加载器，只在守卫放行后调用
async fn load_chatbot() -> Page {
    log::debug!("[Router] Loading chatbot view");
    chatbot_page
}

/// 应用路由表
pub fn app_routes() -> Result<NavigationTable<Page>, ConfigError> {
    NavigationTable::define(vec![
        RouteEntry::new(CHATBOT_PATH, "Chatbot", ViewSource::lazy(load_chatbot)).requires_auth(),
        RouteEntry::new(HOME_PATH, "Home", ViewSource::eager(home_page as Page)),
        RouteEntry::new(LOGIN_PATH, "Login", ViewSource::eager(login_page as Page)).login(),
    ])
}
