//! 配置注册表抽象接口

use crate::builder::ConfigBuilder;
use crate::config::Config;
use config_common::{ConfigResult, OwnerContext};
use std::sync::Arc;

/// 配置注册表 trait
///
/// 将所属上下文映射到已构建的配置实例，每个上下文至多构建一次。
pub trait ConfigProviderResolver: Send + Sync {
    /// 获取上下文对应的配置，不存在时构建并注册
    ///
    /// `context` 为 `None` 时使用当前环境上下文，没有环境上下文时使用回退上下文。
    /// 并发首次访问同一上下文的调用方得到同一个实例。
    /// 构建期间（例如在发现的配置源工厂中）可以再次调用本方法获取其他上下文的配置。
    fn get_config(&self, context: Option<&OwnerContext>) -> ConfigResult<Arc<dyn Config>>;

    /// 注册（覆盖）上下文对应的配置
    ///
    /// 被替换的旧实例不会被释放，由调用方负责。
    fn register_config(&self, config: Arc<dyn Config>, context: &OwnerContext);

    /// 释放配置实例
    ///
    /// `config` 为 `None` 时释放当前环境上下文对应的配置。只移除第一个
    /// 指向同一实例的映射；实例可释放资源时随后调用其 `close`。
    fn release_config(&self, config: Option<&Arc<dyn Config>>) -> ConfigResult<()>;

    /// 获取新的配置构建器
    fn get_builder(&self) -> Box<dyn ConfigBuilder>;
}
