//! 路由守卫 - 唯一的授权决策点
//!
//! 决策本身是纯函数 [`decide`]：同步、全函数、可直接单元测试。
//! [`Guard::before_each`] 是面向宿主导航系统的异步适配层，
//! 通过按值消费的 [`Next`] 保证每次导航恰好产生一个结果。

use crate::route::{NavigationTable, Resolution, RouteEntry, RouteRef};
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use futures::channel::oneshot;
use std::fmt::Display;
use std::rc::Rc;

// =========================================================
// 导航意图与结果
// =========================================================

/// 导航意图：从当前路径前往目标位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    /// 当前路径，首次加载时为 `None`
    pub from: Option<String>,
    /// 目标位置（可带 query / fragment）
    pub to: String,
}

impl NavigationIntent {
    pub fn new(from: Option<&str>, to: &str) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.to_string(),
        }
    }

    pub fn initial(to: &str) -> Self {
        Self::new(None, to)
    }
}

impl Display for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} -> {}", from, self.to),
            None => write!(f, "(initial) -> {}", self.to),
        }
    }
}

/// 守卫状态机（单次导航内有效，不跨导航保存）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Pending,
    Evaluating,
    Allowed,
    Redirected,
}

impl GuardState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Allowed | Self::Redirected)
    }
}

/// 守卫决策结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 放行到目标路由
    Allowed(RouteRef),
    /// 重定向到登录路由，`attempted` 为被拒绝的原始位置
    Redirected { to: RouteRef, attempted: String },
    /// 路径未匹配：守卫不介入，由路由表的兜底策略处理
    NotFound { path: String },
}

impl Outcome {
    /// 对应的终止状态（未匹配视为放行）
    pub fn state(&self) -> GuardState {
        match self {
            Self::Allowed(_) | Self::NotFound { .. } => GuardState::Allowed,
            Self::Redirected { .. } => GuardState::Redirected,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }
}

// =========================================================
// 纯决策函数
// =========================================================

/// **核心守卫逻辑**
///
/// - 目标不需要认证 -> 放行
/// - 目标需要认证且已认证 -> 放行
/// - 目标需要认证且未认证 -> 重定向到登录路由
/// - 目标未匹配 -> `NotFound`，不重定向
pub fn decide<V>(
    target: &Resolution<'_, V>,
    location: &str,
    authenticated: bool,
    login: &RouteEntry<V>,
) -> Outcome {
    match target {
        Resolution::NotFound => Outcome::NotFound {
            path: location.to_string(),
        },
        Resolution::Matched(entry) if entry.is_protected() && !authenticated => {
            Outcome::Redirected {
                to: login.to_ref(),
                attempted: location.to_string(),
            }
        }
        Resolution::Matched(entry) => Outcome::Allowed(entry.to_ref()),
    }
}

// =========================================================
// 续延 (Continuation)
// =========================================================

/// 守卫的续延
///
/// 按值消费，因此至多解析一次；若未解析就被丢弃，
/// 则自动解析为重定向到登录路由，保证导航不会悬挂。
pub struct Next {
    sender: Option<oneshot::Sender<Outcome>>,
    login: RouteRef,
    attempted: String,
}

impl Next {
    /// 创建续延及其接收端
    pub fn channel(login: RouteRef, attempted: &str) -> (Self, oneshot::Receiver<Outcome>) {
        let (sender, receiver) = oneshot::channel();
        let next = Self {
            sender: Some(sender),
            login,
            attempted: attempted.to_string(),
        };
        (next, receiver)
    }

    /// 以给定结果结束本次守卫
    pub fn resolve(mut self, outcome: Outcome) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for Next {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            log::error!(
                "[Guard] Navigation to {} was never resolved. Redirecting to Login.",
                self.attempted
            );
            let _ = sender.send(Outcome::Redirected {
                to: self.login.clone(),
                attempted: std::mem::take(&mut self.attempted),
            });
        }
    }
}

// =========================================================
// 守卫 (Guard)
// =========================================================

/// 路由守卫
///
/// 持有会话存储与路由表的共享引用；只读取会话存储，从不直接访问持久化存储。
pub struct Guard<S, V> {
    session: Rc<SessionStore<S>>,
    table: Rc<NavigationTable<V>>,
}

impl<S, V> Clone for Guard<S, V> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            table: Rc::clone(&self.table),
        }
    }
}

impl<S: KeyValueStorage, V> Guard<S, V> {
    pub fn new(session: Rc<SessionStore<S>>, table: Rc<NavigationTable<V>>) -> Self {
        Self { session, table }
    }

    pub fn table(&self) -> &NavigationTable<V> {
        &self.table
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// 同步评估一次导航意图
    pub fn evaluate(&self, intent: &NavigationIntent) -> Outcome {
        let mut state = GuardState::Pending;
        log::trace!("[Guard] {:?}: {}", state, intent);

        if !self.session.is_restored() {
            log::warn!("[Guard] Evaluating {} before the session was restored", intent);
        }

        state = GuardState::Evaluating;
        let target = self.table.resolve(&intent.to);
        let authenticated = self.session.is_authenticated();
        log::trace!("[Guard] {:?}: {} (authenticated={})", state, intent, authenticated);

        let outcome = decide(&target, &intent.to, authenticated, self.table.login());
        state = outcome.state();
        debug_assert!(state.is_terminal());

        match &outcome {
            Outcome::Redirected { to, .. } => {
                log::info!("[Guard] Access denied for {}. Redirecting to {}.", intent, to.path);
            }
            _ => log::debug!("[Guard] {:?}: {}", state, intent),
        }
        outcome
    }

    /// 导航拦截点（异步适配层）
    ///
    /// 必须调用且只调用一次 `next.resolve`。
    pub async fn before_each(&self, intent: &NavigationIntent, next: Next) {
        let outcome = self.evaluate(intent);
        next.resolve(outcome);
    }

    /// 运行拦截点并等待其结果
    pub async fn intercept(&self, intent: &NavigationIntent) -> Outcome {
        let login = self.table.login().to_ref();
        let (next, receiver) = Next::channel(login.clone(), &intent.to);
        self.before_each(intent, next).await;

        // Next 在 Drop 时总会发送结果，此分支只在发送端被外部泄漏时出现
        receiver.await.unwrap_or_else(|_| Outcome::Redirected {
            to: login,
            attempted: intent.to.clone(),
        })
    }
}
