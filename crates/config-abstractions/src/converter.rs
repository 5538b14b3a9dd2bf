//! 类型转换器抽象

use config_common::ConfigResult;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 未声明优先级的转换器的默认优先级
pub const DEFAULT_CONVERTER_PRIORITY: i32 = 100;

/// 类型转换器 trait
///
/// 将原始字符串配置值转换为目标类型。
pub trait Converter<T>: Send + Sync {
    /// 转换原始值
    fn convert(&self, raw: &str) -> ConfigResult<T>;
}

impl<T, F> Converter<T> for F
where
    F: Fn(&str) -> ConfigResult<T> + Send + Sync,
{
    fn convert(&self, raw: &str) -> ConfigResult<T> {
        self(raw)
    }
}

/// 擦除类型后的转换函数
pub type ErasedConvertFn = Arc<dyn Fn(&str) -> ConfigResult<Box<dyn Any + Send>> + Send + Sync>;

/// 转换器注册信息
///
/// 同一目标类型存在多个转换器时，优先级高的生效。
#[derive(Clone)]
pub struct ConverterRegistration {
    /// 目标类型ID
    pub type_id: TypeId,
    /// 目标类型名称
    pub type_name: &'static str,
    /// 优先级
    pub priority: i32,
    convert: ErasedConvertFn,
}

impl ConverterRegistration {
    /// 以默认优先级注册转换器
    pub fn of<T, C>(converter: C) -> Self
    where
        T: Send + 'static,
        C: Converter<T> + 'static,
    {
        Self::with_priority(converter, DEFAULT_CONVERTER_PRIORITY)
    }

    /// 以指定优先级注册转换器
    pub fn with_priority<T, C>(converter: C, priority: i32) -> Self
    where
        T: Send + 'static,
        C: Converter<T> + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            priority,
            convert: Arc::new(move |raw: &str| {
                converter
                    .convert(raw)
                    .map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        }
    }

    /// 执行转换
    pub fn convert(&self, raw: &str) -> ConfigResult<Box<dyn Any + Send>> {
        (self.convert)(raw)
    }
}

impl std::fmt::Debug for ConverterRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistration")
            .field("type_name", &self.type_name)
            .field("priority", &self.priority)
            .field("convert", &"<function>")
            .finish()
    }
}
