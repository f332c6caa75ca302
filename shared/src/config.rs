//! 应用配置
//!
//! 启动时读取一次。缺少身份提供方 client id 属于启动期配置错误。

use crate::error::ConfigError;
use serde::Deserialize;

// =========================================================
// 配置键与默认值
// =========================================================

/// 身份提供方 client id 的环境变量名
pub const CLIENT_ID_VAR: &str = "LINGUA_GOOGLE_CLIENT_ID";
/// History base 路径的环境变量名
pub const BASE_PATH_VAR: &str = "LINGUA_BASE_PATH";

const DEFAULT_BASE_PATH: &str = "/";

/// 未校验的配置文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default, alias = "clientId")]
    pub google_client_id: Option<String>,
    #[serde(default)]
    pub base_path: Option<String>,
}

/// 已校验的应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    client_id: String,
    base_path: String,
}

impl AppConfig {
    /// 校验配置文档
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let client_id = raw
            .google_client_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingClientId(CLIENT_ID_VAR))?;

        let base_path = normalize_base(raw.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH));

        Ok(Self {
            client_id,
            base_path,
        })
    }

    /// 通过查找函数读取配置（环境变量、构建期常量等）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig {
            google_client_id: lookup(CLIENT_ID_VAR),
            base_path: lookup(BASE_PATH_VAR),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// 去掉地址中的 base 前缀，得到应用内路径
    ///
    /// 不在 base 之下的地址原样返回；base 后直接跟 query / fragment 时视为根路径。
    pub fn strip_base(&self, location: &str) -> String {
        if self.base_path == "/" {
            return location.to_string();
        }
        match location.strip_prefix(self.base_path.as_str()) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            Some(rest) if rest.starts_with(['?', '#']) => format!("/{}", rest),
            _ => location.to_string(),
        }
    }

    /// 为应用内路径加上 base 前缀
    pub fn with_base(&self, path: &str) -> String {
        if self.base_path == "/" {
            path.to_string()
        } else if path == "/" {
            self.base_path.clone()
        } else {
            format!("{}{}", self.base_path, path)
        }
    }
}

/// 规范化 base：以 '/' 开头，除根路径外不以 '/' 结尾
fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_PATH.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_client_id_is_config_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingClientId(CLIENT_ID_VAR));

        let err = AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingClientId(CLIENT_ID_VAR));
    }

    #[test]
    fn test_defaults_base_path_to_root() {
        let config = AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "abc.apps.googleusercontent.com")]))
            .unwrap();
        assert_eq!(config.client_id(), "abc.apps.googleusercontent.com");
        assert_eq!(config.base_path(), "/");
    }

    #[test]
    fn test_base_path_is_normalized() {
        for raw in ["app", "/app", "/app/", "app/"] {
            let config = AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "id"), (BASE_PATH_VAR, raw)]))
                .unwrap();
            assert_eq!(config.base_path(), "/app", "{raw}");
        }
    }

    #[test]
    fn test_strip_and_add_base() {
        let config =
            AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "id"), (BASE_PATH_VAR, "/app")])).unwrap();

        assert_eq!(config.strip_base("/app"), "/");
        assert_eq!(config.strip_base("/app/chatbot"), "/chatbot");
        assert_eq!(config.strip_base("/application"), "/application");
        assert_eq!(config.strip_base("/other"), "/other");

        assert_eq!(config.with_base("/"), "/app");
        assert_eq!(config.with_base("/chatbot"), "/app/chatbot");
    }

    #[test]
    fn test_strip_base_keeps_query_and_fragment_on_root() {
        let config =
            AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "id"), (BASE_PATH_VAR, "/app")])).unwrap();

        assert_eq!(config.strip_base("/app?x=1"), "/?x=1");
        assert_eq!(config.strip_base("/app#f"), "/#f");
        assert_eq!(config.strip_base("/app?lang=fr#top"), "/?lang=fr#top");
        assert_eq!(config.strip_base("/app/chatbot?x=1#f"), "/chatbot?x=1#f");
        assert_eq!(config.strip_base("/apps?x=1"), "/apps?x=1");
    }

    #[test]
    fn test_root_base_is_identity() {
        let config = AppConfig::from_lookup(lookup(&[(CLIENT_ID_VAR, "id")])).unwrap();
        assert_eq!(config.strip_base("/chatbot"), "/chatbot");
        assert_eq!(config.with_base("/chatbot"), "/chatbot");
    }

    #[test]
    fn test_parse_config_document() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"googleClientId": "id-1", "basePath": "/lingua/"}"#).unwrap();
        let config = AppConfig::from_raw(raw).unwrap();
        assert_eq!(config.client_id(), "id-1");
        assert_eq!(config.base_path(), "/lingua");

        let raw: RawConfig = serde_json::from_str(r#"{"clientId": "id-2"}"#).unwrap();
        assert_eq!(AppConfig::from_raw(raw).unwrap().client_id(), "id-2");

        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        assert!(AppConfig::from_raw(raw).is_err());
    }
}
