//! 会话存储模块
//!
//! 持有唯一的认证标志，并镜像写入持久化存储。
//! 启动时恰好调用一次 [`SessionStore::restore`]，之后内存中的值即为唯一事实来源。

use crate::error::StorageError;
use crate::storage::{AUTH_FLAG_KEY, KeyValueStorage, decode_flag, encode_flag};
use std::cell::{Cell, RefCell};

/// 身份提供方回调事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// 登录成功，携带提供方签发的凭据（内容不做检查）
    SignedIn(Credential),
    /// 用户主动注销
    SignedOut,
    /// 提供方报告登录失败
    Failed(String),
}

/// 身份提供方签发的不透明凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// 凭据内容不进入日志
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

/// 持久化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// 写入镜像到持久化存储
    Persisted,
    /// 存储出错后退化为纯内存
    MemoryOnly,
}

type ChangeListener = Box<dyn Fn(bool)>;

/// 会话存储
///
/// 单线程共享（通过 `Rc`），内部使用 `Cell`/`RefCell`。
pub struct SessionStore<S> {
    storage: S,
    authenticated: Cell<bool>,
    persistence: Cell<Persistence>,
    restored: Cell<bool>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// 创建会话存储，初始为未认证
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            authenticated: Cell::new(false),
            persistence: Cell::new(Persistence::Persisted),
            restored: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// 从持久化存储恢复认证标志
    ///
    /// 缺失或无法识别的值视为 `false`。读取失败时退化为纯内存模式。
    pub fn restore(&self) {
        if self.restored.replace(true) {
            log::warn!("[Session] restore() called more than once; keeping in-memory state");
            return;
        }

        let value = match self.storage.get(AUTH_FLAG_KEY) {
            Ok(raw) => decode_flag(raw.as_deref()),
            Err(e) => {
                self.degrade(&e);
                false
            }
        };
        log::debug!("[Session] Restored authentication flag: {}", value);
        self.update(value);
    }

    /// 设置认证标志并镜像写入持久化存储
    pub fn set(&self, authenticated: bool) {
        self.update(authenticated);

        if self.persistence.get() == Persistence::MemoryOnly {
            return;
        }
        if let Err(e) = self.storage.set(AUTH_FLAG_KEY, encode_flag(authenticated)) {
            self.degrade(&e);
        }
    }

    /// 当前是否已认证
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    /// 是否已执行过 restore
    pub fn is_restored(&self) -> bool {
        self.restored.get()
    }

    pub fn persistence(&self) -> Persistence {
        self.persistence.get()
    }

    /// 注册认证状态变化监听器
    ///
    /// 只在值真正改变时调用。监听器内部不能再注册监听器。
    pub fn on_change(&self, listener: impl Fn(bool) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// 处理身份提供方事件
    ///
    /// 返回处理后的认证状态。
    pub fn handle_identity_event(&self, event: IdentityEvent) -> bool {
        match event {
            IdentityEvent::SignedIn(credential) if credential.is_empty() => {
                log::warn!("[Session] Identity provider returned an empty credential; ignoring");
            }
            IdentityEvent::SignedIn(_) => {
                log::info!("[Session] Signed in");
                self.set(true);
            }
            IdentityEvent::SignedOut => {
                log::info!("[Session] Signed out");
                self.set(false);
            }
            IdentityEvent::Failed(reason) => {
                log::warn!("[Session] Sign-in failed: {}", reason);
            }
        }
        self.is_authenticated()
    }

    fn update(&self, value: bool) {
        if self.authenticated.replace(value) == value {
            return;
        }
        for listener in self.listeners.borrow().iter() {
            listener(value);
        }
    }

    fn degrade(&self, error: &StorageError) {
        if self.persistence.replace(Persistence::MemoryOnly) == Persistence::Persisted {
            log::warn!(
                "[Session] {}; continuing with an in-memory session",
                error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;

    /// 总是失败的存储，记录调用次数
    #[derive(Default)]
    struct BrokenStorage {
        calls: Cell<usize>,
    }

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            self.calls.set(self.calls.get() + 1);
            Err(StorageError::Unavailable("localStorage disabled".to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            self.calls.set(self.calls.get() + 1);
            Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn test_new_store_is_unauthenticated() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(!store.is_authenticated());
        assert!(!store.is_restored());
    }

    #[test]
    fn test_restore_with_empty_storage_is_false() {
        let store = SessionStore::new(MemoryStorage::new());
        store.restore();
        assert!(store.is_restored());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_reads_persisted_true() {
        let store = SessionStore::new(MemoryStorage::with_entry(AUTH_FLAG_KEY, "true"));
        store.restore();
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_restore_treats_garbage_as_false() {
        let store = SessionStore::new(MemoryStorage::with_entry(AUTH_FLAG_KEY, "yes"));
        store.restore();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_then_reload_round_trip() {
        let storage = Rc::new(MemoryStorage::new());

        let first = SessionStore::new(Rc::clone(&storage));
        first.restore();
        first.set(true);

        // 模拟页面刷新
        let reloaded = SessionStore::new(Rc::clone(&storage));
        reloaded.restore();
        assert!(reloaded.is_authenticated());

        reloaded.set(false);
        let reloaded_again = SessionStore::new(Rc::clone(&storage));
        reloaded_again.restore();
        assert!(!reloaded_again.is_authenticated());
    }

    #[test]
    fn test_set_is_idempotent() {
        let storage = Rc::new(MemoryStorage::new());
        let store = SessionStore::new(Rc::clone(&storage));
        store.restore();

        store.set(true);
        let once = (
            store.is_authenticated(),
            storage.get(AUTH_FLAG_KEY).unwrap(),
        );
        store.set(true);
        let twice = (
            store.is_authenticated(),
            storage.get(AUTH_FLAG_KEY).unwrap(),
        );

        assert_eq!(once, twice);
        assert_eq!(twice.1.as_deref(), Some("true"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_second_restore_keeps_in_memory_value() {
        let storage = Rc::new(MemoryStorage::new());
        let store = SessionStore::new(Rc::clone(&storage));
        store.restore();
        store.set(true);

        // 外部篡改持久化值不应覆盖内存中的事实来源
        storage.set(AUTH_FLAG_KEY, "false").unwrap();
        store.restore();
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_read_failure_degrades_to_memory_only() {
        let store = SessionStore::new(BrokenStorage::default());
        store.restore();
        assert!(!store.is_authenticated());
        assert_eq!(store.persistence(), Persistence::MemoryOnly);

        store.set(true);
        assert!(store.is_authenticated());
        // 退化后不再访问存储
        assert_eq!(store.storage.calls.get(), 1);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_value() {
        let store = SessionStore::new(BrokenStorage::default());
        store.set(true);
        assert!(store.is_authenticated());
        assert_eq!(store.persistence(), Persistence::MemoryOnly);

        store.set(false);
        assert!(!store.is_authenticated());
        assert_eq!(store.storage.calls.get(), 1);
    }

    #[test]
    fn test_listeners_fire_only_on_change() {
        let store = SessionStore::new(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.on_change(move |value| sink.borrow_mut().push(value));

        store.restore();
        store.set(true);
        store.set(true);
        store.set(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_identity_events() {
        let store = SessionStore::new(MemoryStorage::new());
        store.restore();

        assert!(!store.handle_identity_event(IdentityEvent::Failed("popup closed".into())));
        assert!(!store.handle_identity_event(IdentityEvent::SignedIn(Credential::new(""))));
        assert!(!store.is_authenticated());
        assert!(store.handle_identity_event(IdentityEvent::SignedIn(Credential::new("eyJhbGciOi"))));
        assert!(!store.handle_identity_event(IdentityEvent::SignedOut));
    }

    #[test]
    fn test_non_empty_credential_is_not_inspected() {
        let store = SessionStore::new(MemoryStorage::new());
        store.restore();

        // 凭据内容由提供方负责，只要非空即视为登录成功
        assert!(store.handle_identity_event(IdentityEvent::SignedIn(Credential::new("  "))));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_credential_debug_hides_content() {
        let credential = Credential::new("secret-token");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("12 bytes"));
    }
}
