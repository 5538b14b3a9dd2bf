//! 配置构建协议

use crate::config::Config;
use crate::converter::ConverterRegistration;
use crate::source::ConfigSource;
use config_common::{ConfigResult, OwnerContext};
use std::sync::Arc;

/// 配置构建器 trait
///
/// 链式构建协议，每一步消费构建器并返回新的构建器：
///
/// ```text
/// for_context -> add_default_sources -> add_discovered_sources
///             -> add_discovered_converters -> build
/// ```
///
/// 配置源之间的优先级规则由构建器实现决定，后添加的步骤不得改变
/// 先添加配置源已确定的优先级规则。
pub trait ConfigBuilder: Send {
    /// 绑定所属上下文
    fn for_context(self: Box<Self>, context: &OwnerContext) -> Box<dyn ConfigBuilder>;

    /// 添加默认配置源
    fn add_default_sources(self: Box<Self>) -> Box<dyn ConfigBuilder>;

    /// 添加发现机制提供的配置源
    fn add_discovered_sources(self: Box<Self>) -> Box<dyn ConfigBuilder>;

    /// 添加发现机制提供的转换器
    fn add_discovered_converters(self: Box<Self>) -> Box<dyn ConfigBuilder>;

    /// 添加显式指定的配置源
    fn with_sources(self: Box<Self>, sources: Vec<Arc<dyn ConfigSource>>) -> Box<dyn ConfigBuilder>;

    /// 添加显式指定的转换器
    fn with_converters(self: Box<Self>, converters: Vec<ConverterRegistration>)
        -> Box<dyn ConfigBuilder>;

    /// 完成构建
    fn build(self: Box<Self>) -> ConfigResult<Arc<dyn Config>>;
}
