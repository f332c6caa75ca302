//! 导航服务 - 宿主侧适配层
//!
//! 实现 "意图 -> 守卫 -> 加载 -> 提交 History -> 挂载" 的导航流程。
//! 与浏览器无关：History 操作与视图挂载由注入的 [`NavigationHost`] 完成。

use crate::guard::{Guard, NavigationIntent, Outcome};
use crate::route::{RouteEntry, RouteRef};
use crate::storage::KeyValueStorage;
use std::cell::{Cell, RefCell};

/// 导航的 History 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// 用户或程序发起的导航，压入新记录
    Push,
    /// 首次加载或重新评估，替换当前记录
    Replace,
    /// 浏览器前进/后退：地址栏已变化，仅在重定向时替换
    Traverse,
}

/// 实际执行的 History 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Push,
    Replace,
}

impl HistoryMode {
    fn action(self, redirected: bool) -> Option<HistoryAction> {
        match self {
            Self::Push => Some(HistoryAction::Push),
            Self::Replace => Some(HistoryAction::Replace),
            Self::Traverse if redirected => Some(HistoryAction::Replace),
            Self::Traverse => None,
        }
    }
}

/// 已挂载的视图
#[derive(Debug, Clone, PartialEq)]
pub enum Mounted<V> {
    Route { route: RouteRef, view: V },
    /// 未匹配且路由表没有兜底路由
    NotFound { path: String },
}

/// 导航宿主（浏览器 History + 展示层）
pub trait NavigationHost<V> {
    /// 更新地址栏
    fn commit(&self, location: &str, action: HistoryAction);

    /// 挂载视图
    fn mount(&self, mounted: Mounted<V>);
}

/// 导航服务
///
/// 请求按到达顺序串行处理；较新的导航会取代仍在等待视图加载的旧导航。
pub struct Navigator<S, V, H> {
    guard: Guard<S, V>,
    host: H,
    current: RefCell<Option<String>>,
    generation: Cell<u64>,
}

impl<S, V, H> Navigator<S, V, H>
where
    S: KeyValueStorage,
    V: Clone + 'static,
    H: NavigationHost<V>,
{
    pub fn new(guard: Guard<S, V>, host: H) -> Self {
        Self {
            guard,
            host,
            current: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    pub fn guard(&self) -> &Guard<S, V> {
        &self.guard
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// 当前已提交的位置
    pub fn current_location(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 加载视图 -> 提交 History -> 挂载
    pub async fn navigate(&self, location: &str, mode: HistoryMode) -> Outcome {
        let ticket = self.generation.get().wrapping_add(1);
        self.generation.set(ticket);

        let intent = NavigationIntent::new(self.current.borrow().as_deref(), location);
        let outcome = self.guard.intercept(&intent).await;

        // --- Step 1: 确定提交位置与要挂载的路由 ---
        let table = self.guard.table();
        let (commit_to, entry): (&str, Option<&RouteEntry<V>>) = match &outcome {
            Outcome::Allowed(route) => (location, table.by_name(&route.name)),
            Outcome::Redirected { to, .. } => (to.path.as_str(), Some(table.login())),
            Outcome::NotFound { .. } => (location, table.fallback()),
        };

        // --- Step 2: 加载视图（重定向时受保护视图的加载器不会被调用） ---
        let mounted = match entry {
            Some(entry) => Mounted::Route {
                route: entry.to_ref(),
                view: entry.view().load().await,
            },
            None => Mounted::NotFound {
                path: location.to_string(),
            },
        };

        if self.generation.get() != ticket {
            log::debug!("[Router] Navigation {} superseded by a newer request", intent);
            return outcome;
        }

        // --- Step 3: 提交 History 并挂载 ---
        let same_location = self.current.borrow().as_deref() == Some(commit_to);
        let action = match mode.action(outcome.is_redirect()) {
            Some(HistoryAction::Push) if same_location => Some(HistoryAction::Replace),
            other => other,
        };
        if let Some(action) = action {
            self.host.commit(commit_to, action);
        }
        self.current.replace(Some(commit_to.to_string()));
        self.host.mount(mounted);

        outcome
    }

    /// 以当前位置重新执行守卫（如注销后离开受保护页面）
    pub async fn reevaluate(&self) -> Option<Outcome> {
        let location = self.current_location()?;
        Some(self.navigate(&location, HistoryMode::Replace).await)
    }
}
