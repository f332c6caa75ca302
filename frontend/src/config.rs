//! 启动配置
//!
//! 优先读取页面内联的 JSON 配置文档：
//! `<script id="lingua-config" type="application/json">{"googleClientId": "..."}</script>`，
//! 缺失的字段回退到构建期环境变量。

use leptos::prelude::*;
use lingua_shared::config::{BASE_PATH_VAR, CLIENT_ID_VAR};
use lingua_shared::{AppConfig, ConfigError, RawConfig};

const CONFIG_ELEMENT_ID: &str = "lingua-config";

/// 构建期环境变量
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        CLIENT_ID_VAR => option_env!("LINGUA_GOOGLE_CLIENT_ID"),
        BASE_PATH_VAR => option_env!("LINGUA_BASE_PATH"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 读取内联配置文档
fn inline_document() -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()
        .filter(|text| !text.trim().is_empty())
}

/// 读取并校验应用配置
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut raw = match inline_document() {
        Some(text) => serde_json_wasm::from_str::<RawConfig>(&text)
            .map_err(|e| ConfigError::InvalidDocument(e.to_string()))?,
        None => RawConfig::default(),
    };

    raw.google_client_id = raw.google_client_id.or_else(|| build_env(CLIENT_ID_VAR));
    raw.base_path = raw.base_path.or_else(|| build_env(BASE_PATH_VAR));

    AppConfig::from_raw(raw)
}

/// 从 Context 获取应用配置
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}
