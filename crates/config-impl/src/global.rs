//! 进程级配置注册表入口
//!
//! 显式创建的 [`DefaultConfigProvider`] 是首选用法，这里提供的全局实例
//! 只是为了方便应用入口直接取配置。

use crate::provider::DefaultConfigProvider;
use config_abstractions::{Config, ConfigProviderResolver};
use config_common::{ConfigResult, OwnerContext};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// 全局配置注册表
static GLOBAL_RESOLVER: Lazy<RwLock<Option<Arc<dyn ConfigProviderResolver>>>> =
    Lazy::new(|| RwLock::new(None));

/// 获取全局配置注册表，未设置时创建默认注册表
pub fn resolver_instance() -> Arc<dyn ConfigProviderResolver> {
    if let Some(resolver) = GLOBAL_RESOLVER.read().as_ref() {
        return resolver.clone();
    }

    let mut slot = GLOBAL_RESOLVER.write();
    slot.get_or_insert_with(|| {
        info!("创建默认全局配置注册表");
        Arc::new(DefaultConfigProvider::new()) as Arc<dyn ConfigProviderResolver>
    })
    .clone()
}

/// 替换全局配置注册表
///
/// 旧注册表中的配置实例不会被释放。
pub fn set_resolver_instance(resolver: Arc<dyn ConfigProviderResolver>) {
    *GLOBAL_RESOLVER.write() = Some(resolver);
    info!("已替换全局配置注册表");
}

/// 全局配置访问门面
#[derive(Debug, Clone, Copy)]
pub struct ConfigProvider;

impl ConfigProvider {
    /// 获取当前环境上下文的配置
    pub fn get_config() -> ConfigResult<Arc<dyn Config>> {
        resolver_instance().get_config(None)
    }

    /// 获取指定上下文的配置
    pub fn get_config_for(context: &OwnerContext) -> ConfigResult<Arc<dyn Config>> {
        resolver_instance().get_config(Some(context))
    }
}
