//! 配置源抽象接口

use config_common::Closeable;
use std::collections::HashMap;

/// 配置源声明自身序数时使用的属性名
pub const CONFIG_ORDINAL: &str = "config_ordinal";

/// 未声明序数的配置源的默认序数
pub const DEFAULT_ORDINAL: i32 = 100;

/// 配置源 trait
///
/// 定义从不同数据源读取原始字符串配置的统一接口。
/// 序数越高的配置源优先级越高。
pub trait ConfigSource: Send + Sync {
    /// 获取配置源名称
    fn name(&self) -> &str;

    /// 获取原始配置值
    fn get_value(&self, key: &str) -> Option<String>;

    /// 获取全部属性
    fn get_properties(&self) -> HashMap<String, String>;

    /// 获取所有配置键
    fn property_names(&self) -> Vec<String> {
        self.get_properties().into_keys().collect()
    }

    /// 获取配置源序数
    ///
    /// 默认读取 `config_ordinal` 属性，缺失或无法解析时为 [`DEFAULT_ORDINAL`]。
    fn ordinal(&self) -> i32 {
        self.get_value(CONFIG_ORDINAL)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_ORDINAL)
    }

    /// 持有需释放资源的配置源返回自身
    fn as_closeable(&self) -> Option<&dyn Closeable> {
        None
    }
}

impl std::fmt::Debug for dyn ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSource")
            .field("name", &self.name())
            .field("ordinal", &self.ordinal())
            .finish()
    }
}
