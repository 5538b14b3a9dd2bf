//! 所属上下文标识与环境上下文解析
//!
//! [`OwnerContext`] 是配置实例的作用域键。每次调用 [`OwnerContext::new`]
//! 都会得到一个新的身份，相等性只比较身份，标签仅用于诊断输出。

use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// 下一个可分配的上下文标识，0 保留给根上下文
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

static ROOT_CONTEXT: Lazy<OwnerContext> = Lazy::new(|| OwnerContext {
    id: 0,
    label: Arc::from("root"),
});

thread_local! {
    static AMBIENT_CONTEXT: RefCell<Option<OwnerContext>> = const { RefCell::new(None) };
}

/// 配置所属上下文
///
/// 不透明的身份令牌，类似模块或加载器句柄。克隆得到的是同一身份。
#[derive(Clone)]
pub struct OwnerContext {
    id: u64,
    label: Arc<str>,
}

impl OwnerContext {
    /// 创建新的上下文身份
    pub fn new(label: impl Into<String>) -> Self {
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            label: Arc::from(label.into()),
        }
    }

    /// 进程级根上下文，没有环境上下文时的回退值
    pub fn root() -> Self {
        ROOT_CONTEXT.clone()
    }

    /// 身份标识
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 诊断标签
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 当前线程的环境上下文
    pub fn current() -> Option<Self> {
        AMBIENT_CONTEXT.with(|slot| slot.borrow().clone())
    }

    /// 将该上下文设为当前线程的环境上下文，守卫析构时恢复之前的值
    #[must_use = "环境上下文在守卫析构时即被恢复"]
    pub fn enter(&self) -> ContextGuard {
        let previous = AMBIENT_CONTEXT.with(|slot| slot.replace(Some(self.clone())));
        trace!("进入环境上下文: {}", self);
        ContextGuard { previous }
    }
}

impl PartialEq for OwnerContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OwnerContext {}

impl Hash for OwnerContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for OwnerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerContext")
            .field("id", &self.id)
            .field("label", &&*self.label)
            .finish()
    }
}

impl fmt::Display for OwnerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.id)
    }
}

/// 环境上下文守卫
///
/// 由 [`OwnerContext::enter`] 返回，析构时恢复进入前的环境上下文。
#[derive(Debug)]
pub struct ContextGuard {
    previous: Option<OwnerContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        AMBIENT_CONTEXT.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}

/// 环境上下文解析器 trait
///
/// 调用方未显式传入上下文时，由它提供“当前”上下文。
pub trait ContextResolver: Send + Sync {
    /// 获取当前上下文，没有时返回 `None`
    fn current(&self) -> Option<OwnerContext>;
}

/// 基于线程局部存储的默认解析器
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadContextResolver;

impl ContextResolver for ThreadContextResolver {
    fn current(&self) -> Option<OwnerContext> {
        OwnerContext::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_not_label_decides_equality() {
        let a = OwnerContext::new("module");
        let b = OwnerContext::new("module");

        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn root_is_stable() {
        assert_eq!(OwnerContext::root(), OwnerContext::root());
        assert_eq!(OwnerContext::root().id(), 0);
    }

    #[test]
    fn nested_scopes_restore_previous_context() {
        let outer = OwnerContext::new("outer");
        let inner = OwnerContext::new("inner");

        assert_eq!(OwnerContext::current(), None);
        {
            let _outer_guard = outer.enter();
            assert_eq!(OwnerContext::current(), Some(outer.clone()));
            {
                let _inner_guard = inner.enter();
                assert_eq!(ThreadContextResolver.current(), Some(inner.clone()));
            }
            assert_eq!(OwnerContext::current(), Some(outer.clone()));
        }
        assert_eq!(OwnerContext::current(), None);
    }

    #[test]
    fn ambient_context_is_per_thread() {
        let ctx = OwnerContext::new("main");
        let _guard = ctx.enter();

        let seen = std::thread::spawn(OwnerContext::current).join().unwrap();
        assert_eq!(seen, None);
    }
}
