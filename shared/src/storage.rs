//! 持久化存储抽象
//!
//! 浏览器端由 `localStorage` 实现，测试与降级场景使用 [`MemoryStorage`]。

use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 认证标志在持久化存储中的键名
pub const AUTH_FLAG_KEY: &str = "isAuthenticated";

/// 键值字符串存储
///
/// 存储 I/O 视为同步且非阻塞。
pub trait KeyValueStorage {
    /// 读取键值，键不存在时返回 `Ok(None)`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 写入键值
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始键值创建（模拟已有数据的存储）
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 将认证标志序列化为字面量 `"true"` / `"false"`
pub fn encode_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// 解析持久化的认证标志
///
/// 只有字面量 `"true"` 视为已认证，缺失或其他任何值都视为未认证。
pub fn decode_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(AUTH_FLAG_KEY).unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_overwrites_value() {
        let storage = MemoryStorage::with_entry(AUTH_FLAG_KEY, "true");
        storage.set(AUTH_FLAG_KEY, "false").unwrap();
        assert_eq!(storage.get(AUTH_FLAG_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_decode_flag_only_accepts_literal_true() {
        assert!(decode_flag(Some("true")));
        assert!(!decode_flag(Some("false")));
        assert!(!decode_flag(Some("TRUE")));
        assert!(!decode_flag(Some("1")));
        assert!(!decode_flag(Some("")));
        assert!(!decode_flag(None));
    }

    #[test]
    fn test_shared_storage_through_rc() {
        let storage = Rc::new(MemoryStorage::new());
        let handle = Rc::clone(&storage);
        handle.set(AUTH_FLAG_KEY, encode_flag(true)).unwrap();
        assert_eq!(storage.get(AUTH_FLAG_KEY).unwrap().as_deref(), Some("true"));
    }
}
