//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 会话存储是唯一的事实来源，这里的信号只是它的响应式镜像，
//! 路由服务通过注入的认证信号来感知状态变化。

use crate::identity;
use crate::web::BrowserStorage;
use leptos::prelude::*;
use lingua_shared::{IdentityEvent, SessionStore};
use std::rc::Rc;

pub type AppSession = SessionStore<BrowserStorage>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: StoredValue<Rc<AppSession>, LocalStorage>,
    /// 认证状态镜像（由会话存储的变化监听器写入）
    state: RwSignal<bool>,
}

impl AuthContext {
    /// 创建认证上下文
    ///
    /// 会话应已在启动时 restore。
    pub fn new(session: Rc<AppSession>) -> Self {
        let state = RwSignal::new(session.is_authenticated());
        session.on_change(move |value| state.set(value));
        Self {
            session: StoredValue::new_local(session),
            state,
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get())
    }

    fn apply(&self, event: IdentityEvent) -> bool {
        self.session
            .with_value(|session| session.handle_identity_event(event))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 身份提供方登录回调
///
/// # Returns
/// 登录是否成功
pub fn login(ctx: &AuthContext, event: IdentityEvent) -> bool {
    ctx.apply(event)
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    identity::disable_auto_select();
    ctx.apply(IdentityEvent::SignedOut);
}

