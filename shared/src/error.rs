use thiserror::Error;

// =========================================================
// 启动期配置错误 (Fatal)
// =========================================================

/// 配置错误
///
/// 只在启动阶段产生：路由表校验失败或缺少身份提供方配置。
/// 出现此类错误时应用拒绝完成启动。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 路由路径重复
    #[error("duplicate route path '{0}'")]
    DuplicateRoutePath(String),
    /// 路由名称重复
    #[error("duplicate route name '{0}'")]
    DuplicateRouteName(String),
    /// 路由路径必须以 '/' 开头
    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),
    /// 未指定登录路由
    #[error("no route is designated as the login route")]
    MissingLoginRoute,
    #[error("more than one login route: '{first}' and '{second}'")]
    MultipleLoginRoutes { first: String, second: String },
    /// 登录路由不能需要认证，否则重定向会无限循环
    #[error("login route '{0}' must not require authentication")]
    ProtectedLoginRoute(String),
    #[error("more than one fallback route: '{first}' and '{second}'")]
    MultipleFallbacks { first: String, second: String },
    /// 兜底路由不能需要认证，未匹配路径不应被重定向到登录页
    #[error("fallback route '{0}' must not require authentication")]
    ProtectedFallbackRoute(String),
    /// 缺少身份提供方 client id
    #[error("identity provider client id is missing (set {0})")]
    MissingClientId(&'static str),
    /// 配置文档无法解析
    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),
}

// =========================================================
// 持久化存储错误 (Recoverable)
// =========================================================

/// 持久化存储错误
///
/// 永远不会传播到守卫：会话存储遇到此错误后退化为纯内存模式。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// 存储后端不可用（如隐私模式下禁用 localStorage）
    #[error("persisted storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read '{key}': {reason}")]
    ReadFailed { key: String, reason: String },
    /// 写入失败（如超出配额）
    #[error("failed to write '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
}
