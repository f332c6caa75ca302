//! Lingua 导航核心
//!
//! 与宿主无关的认证导航引擎：
//! - `session`: 会话存储（认证标志 + 持久化镜像）
//! - `route`: 路由表（路径 -> 视图，受保护标记，延迟加载）
//! - `guard`: 路由守卫（唯一的授权决策点）
//! - `navigator`: 导航服务（意图 -> 守卫 -> 加载 -> 挂载）

pub mod config;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod route;
pub mod session;
pub mod storage;

pub use config::{AppConfig, RawConfig};
pub use error::{ConfigError, StorageError};
pub use guard::{Guard, GuardState, NavigationIntent, Next, Outcome, decide};
pub use navigator::{HistoryAction, HistoryMode, Mounted, NavigationHost, Navigator};
pub use route::{
    NavigationTable, Resolution, RouteEntry, RouteRef, RouteRole, ViewLoader, ViewSource,
};
pub use session::{Credential, IdentityEvent, Persistence, SessionStore};
pub use storage::{AUTH_FLAG_KEY, KeyValueStorage, MemoryStorage};
