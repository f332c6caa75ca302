//! 路由表模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 路由表在启动时定义并校验一次，之后不可变。

use crate::error::ConfigError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

// =========================================================
// 视图加载 (View Loading)
// =========================================================

/// 延迟视图加载器
///
/// 每次导航到对应路由时至多调用一次，结果不做缓存。
/// 实现必须可以重复调用，且除产生视图外没有副作用。
#[async_trait(?Send)]
pub trait ViewLoader<V> {
    async fn load(&self) -> V;
}

#[async_trait(?Send)]
impl<V, F, Fut> ViewLoader<V> for F
where
    V: 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = V> + 'static,
{
    async fn load(&self) -> V {
        (self)().await
    }
}

/// 路由对应的视图来源
pub enum ViewSource<V> {
    /// 立即可用的视图
    Eager(V),
    /// 导航时才加载的视图
    Lazy(Rc<dyn ViewLoader<V>>),
}

impl<V: Clone + 'static> ViewSource<V> {
    pub fn eager(view: V) -> Self {
        Self::Eager(view)
    }

    pub fn lazy(loader: impl ViewLoader<V> + 'static) -> Self {
        Self::Lazy(Rc::new(loader))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// 产生视图
    pub async fn load(&self) -> V {
        match self {
            Self::Eager(view) => view.clone(),
            Self::Lazy(loader) => loader.load().await,
        }
    }
}

impl<V: Clone> Clone for ViewSource<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Eager(view) => Self::Eager(view.clone()),
            Self::Lazy(loader) => Self::Lazy(Rc::clone(loader)),
        }
    }
}

// =========================================================
// 路由条目 (Route Entry)
// =========================================================

/// 路由在表中的特殊角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRole {
    #[default]
    Standard,
    /// 认证失败时的重定向目标
    Login,
    /// 未匹配路径的兜底路由
    Fallback,
}

/// 路由条目
pub struct RouteEntry<V> {
    path: String,
    name: String,
    view: ViewSource<V>,
    requires_auth: bool,
    role: RouteRole,
}

impl<V> RouteEntry<V> {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewSource<V>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
            requires_auth: false,
            role: RouteRole::Standard,
        }
    }

    /// 标记为受保护路由
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// 指定为登录路由
    pub fn login(mut self) -> Self {
        self.role = RouteRole::Login;
        self
    }

    /// 指定为兜底路由
    pub fn fallback(mut self) -> Self {
        self.role = RouteRole::Fallback;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> &ViewSource<V> {
        &self.view
    }

    /// **核心守卫属性：该路由是否需要认证**
    pub fn is_protected(&self) -> bool {
        self.requires_auth
    }

    pub fn role(&self) -> RouteRole {
        self.role
    }

    pub fn to_ref(&self) -> RouteRef {
        RouteRef {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

/// 路由引用（名称 + 路径），用于导航结果
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRef {
    pub name: String,
    pub path: String,
}

impl Display for RouteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path, self.name)
    }
}

// =========================================================
// 路由表 (Navigation Table)
// =========================================================

/// 路径解析结果
pub enum Resolution<'a, V> {
    Matched(&'a RouteEntry<V>),
    /// 未匹配，由调用方决定展示 404 或忽略
    NotFound,
}

impl<V> Resolution<'_, V> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// 静态路由表
pub struct NavigationTable<V> {
    entries: Vec<RouteEntry<V>>,
    by_path: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    login: usize,
    fallback: Option<usize>,
}

impl<V> NavigationTable<V> {
    /// 定义并校验路由表
    ///
    /// 路径、名称必须唯一；恰好一个登录路由，至多一个兜底路由，二者都不能需要认证。
    pub fn define(entries: Vec<RouteEntry<V>>) -> Result<Self, ConfigError> {
        let mut by_path = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut login: Option<usize> = None;
        let mut fallback: Option<usize> = None;

        for (index, entry) in entries.iter().enumerate() {
            if !entry.path.starts_with('/') {
                return Err(ConfigError::InvalidPath(entry.path.clone()));
            }
            if by_path.insert(entry.path.clone(), index).is_some() {
                return Err(ConfigError::DuplicateRoutePath(entry.path.clone()));
            }
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(ConfigError::DuplicateRouteName(entry.name.clone()));
            }

            match entry.role {
                RouteRole::Standard => {}
                RouteRole::Login => {
                    if entry.requires_auth {
                        return Err(ConfigError::ProtectedLoginRoute(entry.name.clone()));
                    }
                    if let Some(first) = login.replace(index) {
                        return Err(ConfigError::MultipleLoginRoutes {
                            first: entries[first].name.clone(),
                            second: entry.name.clone(),
                        });
                    }
                }
                RouteRole::Fallback => {
                    if entry.requires_auth {
                        return Err(ConfigError::ProtectedFallbackRoute(entry.name.clone()));
                    }
                    if let Some(first) = fallback.replace(index) {
                        return Err(ConfigError::MultipleFallbacks {
                            first: entries[first].name.clone(),
                            second: entry.name.clone(),
                        });
                    }
                }
            }
        }

        let login = login.ok_or(ConfigError::MissingLoginRoute)?;

        Ok(Self {
            entries,
            by_path,
            by_name,
            login,
            fallback,
        })
    }

    /// 将 URL 解析为路由条目
    ///
    /// 只比较路径部分（忽略 `?query` 与 `#fragment`），容忍末尾斜杠。
    pub fn resolve(&self, location: &str) -> Resolution<'_, V> {
        let path = path_component(location);
        let index = self.by_path.get(path).or_else(|| {
            let trimmed = path.trim_end_matches('/');
            if trimmed.len() < path.len() && !trimmed.is_empty() {
                self.by_path.get(trimmed)
            } else {
                None
            }
        });

        match index {
            Some(&i) => Resolution::Matched(&self.entries[i]),
            None => Resolution::NotFound,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteEntry<V>> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// 认证失败时的重定向目标
    pub fn login(&self) -> &RouteEntry<V> {
        &self.entries[self.login]
    }

    pub fn fallback(&self) -> Option<&RouteEntry<V>> {
        self.fallback.map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry<V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn path_component(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Page = &'static str;

    fn home() -> RouteEntry<Page> {
        RouteEntry::new("/", "Home", ViewSource::eager("home"))
    }

    fn login() -> RouteEntry<Page> {
        RouteEntry::new("/login", "Login", ViewSource::eager("login")).login()
    }

    fn chatbot() -> RouteEntry<Page> {
        RouteEntry::new("/chatbot", "Chatbot", ViewSource::lazy(|| async { "chatbot" }))
            .requires_auth()
    }

    fn table() -> NavigationTable<Page> {
        NavigationTable::define(vec![chatbot(), home(), login()]).unwrap()
    }

    #[test]
    fn test_define_accepts_valid_table() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.login().name(), "Login");
        assert!(table.fallback().is_none());
        assert!(table.by_name("Chatbot").unwrap().is_protected());
        assert!(!table.by_name("Home").unwrap().is_protected());
    }

    #[test]
    fn test_define_rejects_duplicate_path() {
        let dup = RouteEntry::new("/", "Landing", ViewSource::eager("landing"));
        let err = NavigationTable::define(vec![home(), login(), dup]).err().unwrap();
        assert_eq!(err, ConfigError::DuplicateRoutePath("/".to_string()));
    }

    #[test]
    fn test_define_rejects_duplicate_name() {
        let dup = RouteEntry::new("/home", "Home", ViewSource::eager("home"));
        let err = NavigationTable::define(vec![home(), login(), dup]).err().unwrap();
        assert_eq!(err, ConfigError::DuplicateRouteName("Home".to_string()));
    }

    #[test]
    fn test_define_rejects_relative_path() {
        let bad = RouteEntry::new("chatbot", "Chatbot", ViewSource::eager("chatbot"));
        let err = NavigationTable::define(vec![login(), bad]).err().unwrap();
        assert_eq!(err, ConfigError::InvalidPath("chatbot".to_string()));
    }

    #[test]
    fn test_define_requires_login_route() {
        let err = NavigationTable::define(vec![home(), chatbot()]).err().unwrap();
        assert_eq!(err, ConfigError::MissingLoginRoute);
    }

    #[test]
    fn test_define_rejects_protected_login() {
        let err = NavigationTable::define(vec![home(), login().requires_auth()])
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ProtectedLoginRoute("Login".to_string()));
    }

    #[test]
    fn test_define_rejects_second_login() {
        let other = RouteEntry::new("/signin", "SignIn", ViewSource::eager("signin")).login();
        let err = NavigationTable::define(vec![login(), other]).err().unwrap();
        assert_eq!(
            err,
            ConfigError::MultipleLoginRoutes {
                first: "Login".to_string(),
                second: "SignIn".to_string(),
            }
        );
    }

    #[test]
    fn test_define_fallback_rules() {
        let table = NavigationTable::define(vec![home().fallback(), login()]).unwrap();
        assert_eq!(table.fallback().unwrap().name(), "Home");

        let err = NavigationTable::define(vec![home().fallback(), login(), chatbot().fallback()])
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ProtectedFallbackRoute("Chatbot".to_string()));

        let other = RouteEntry::new("/about", "About", ViewSource::eager("about")).fallback();
        let err = NavigationTable::define(vec![home().fallback(), login(), other])
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MultipleFallbacks { .. }));
    }

    #[test]
    fn test_resolve_exact_paths() {
        let table = table();
        let Resolution::Matched(entry) = table.resolve("/chatbot") else {
            panic!("expected /chatbot to match");
        };
        assert_eq!(entry.name(), "Chatbot");

        let Resolution::Matched(entry) = table.resolve("/") else {
            panic!("expected / to match");
        };
        assert_eq!(entry.name(), "Home");
    }

    #[test]
    fn test_resolve_ignores_query_fragment_and_trailing_slash() {
        let table = table();
        for location in ["/chatbot?lang=fr", "/chatbot#top", "/chatbot/", "/chatbot//?x=1"] {
            match table.resolve(location) {
                Resolution::Matched(entry) => assert_eq!(entry.name(), "Chatbot", "{location}"),
                Resolution::NotFound => panic!("{location} should resolve"),
            }
        }
    }

    #[test]
    fn test_resolve_unknown_path_is_not_found() {
        let table = table();
        assert!(table.resolve("/unknown").is_not_found());
        assert!(table.resolve("/chat").is_not_found());
        assert!(table.resolve("/chatbot/history").is_not_found());
        assert!(table.resolve("").is_not_found());
    }

    #[tokio::test]
    async fn test_lazy_loader_runs_on_every_load() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source: ViewSource<Page> = ViewSource::lazy(move || {
            counter.set(counter.get() + 1);
            async { "chatbot" }
        });

        assert!(source.is_lazy());
        assert_eq!(calls.get(), 0);
        assert_eq!(source.load().await, "chatbot");
        assert_eq!(source.clone().load().await, "chatbot");
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_eager_view_loads_without_loader() {
        let source = ViewSource::eager("home");
        assert!(!source.is_lazy());
        assert_eq!(source.load().await, "home");
    }
}
