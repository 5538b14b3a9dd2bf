//! 配置对象生命周期管理

use crate::errors::BoxError;

/// 可释放资源 trait
///
/// 配置实例或配置源持有需要显式释放的资源时实现此 trait。
/// 注册表在移除实例之后调用 [`Closeable::close`]。
pub trait Closeable: Send + Sync {
    /// 释放资源
    fn close(&self) -> Result<(), BoxError>;
}
