//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现 [`KeyValueStorage`]，错误映射为 [`StorageError`]。

use lingua_shared::{KeyValueStorage, StorageError};

/// 浏览器 LocalStorage
///
/// 命名避开 leptos 的 `LocalStorage` 存储标记。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    ///
    /// 隐私模式或禁用存储时返回 `StorageError::Unavailable`。
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::ReadFailed {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
