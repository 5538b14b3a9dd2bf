//! 配置对象抽象接口

use crate::source::ConfigSource;
use config_common::{Closeable, ConfigError, ConfigResult};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 已构建的配置对象 trait
///
/// 由 [`ConfigBuilder`](crate::ConfigBuilder) 产出，注册表按所属上下文共享。
pub trait Config: Send + Sync {
    /// 按配置源优先级解析原始值
    fn get_raw_value(&self, key: &str) -> Option<String>;

    /// 所有配置源中出现过的配置键
    fn property_names(&self) -> Vec<String>;

    /// 按优先级从高到低排列的配置源
    fn config_sources(&self) -> Vec<Arc<dyn ConfigSource>>;

    /// 使用目标类型的转换器转换原始值
    fn convert_raw(
        &self,
        key: &str,
        raw: &str,
        type_id: TypeId,
        type_name: &'static str,
    ) -> ConfigResult<Box<dyn Any + Send>>;

    /// 持有需释放资源的配置返回自身
    fn as_closeable(&self) -> Option<&dyn Closeable> {
        None
    }

    /// 是否已关闭，关闭后类型化读取返回 [`ConfigError::Closed`]
    fn is_closed(&self) -> bool {
        false
    }
}

/// 类型化读取扩展
pub trait ConfigExt {
    /// 读取并转换配置值，键不存在时返回 [`ConfigError::KeyNotFound`]
    fn get_value<T: Send + 'static>(&self, key: &str) -> ConfigResult<T>;

    /// 读取并转换配置值，键不存在时返回 `None`
    ///
    /// 配置已关闭时返回 [`ConfigError::Closed`]。
    fn get_optional_value<T: Send + 'static>(&self, key: &str) -> ConfigResult<Option<T>>;
}

impl<C: Config + ?Sized> ConfigExt for C {
    fn get_value<T: Send + 'static>(&self, key: &str) -> ConfigResult<T> {
        self.get_optional_value(key)?
            .ok_or_else(|| ConfigError::key_not_found(key))
    }

    fn get_optional_value<T: Send + 'static>(&self, key: &str) -> ConfigResult<Option<T>> {
        if self.is_closed() {
            return Err(ConfigError::Closed);
        }

        let Some(raw) = self.get_raw_value(key) else {
            return Ok(None);
        };

        let type_name = std::any::type_name::<T>();
        let value = self.convert_raw(key, &raw, TypeId::of::<T>(), type_name)?;
        value
            .downcast::<T>()
            .map(|typed| Some(*typed))
            .map_err(|_| ConfigError::conversion(key, type_name, "转换器返回了不匹配的类型"))
    }
}

/// 判断两个配置句柄是否指向同一实例
///
/// 只比较分配地址，不比较内容。
pub fn same_instance(a: &Arc<dyn Config>, b: &Arc<dyn Config>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

impl std::fmt::Debug for dyn Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("sources", &self.config_sources().len())
            .field("closeable", &self.as_closeable().is_some())
            .field("closed", &self.is_closed())
            .finish()
    }
}
