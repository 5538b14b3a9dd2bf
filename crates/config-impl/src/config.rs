//! 默认配置对象实现

use config_abstractions::{Config, ConfigSource, ConverterRegistration};
use config_common::{BoxError, Closeable, ConfigError, ConfigResult};
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// 默认配置对象
///
/// 按序数从高到低询问配置源，第一个给出值的配置源生效。
pub struct ConfigImpl {
    sources: Vec<Arc<dyn ConfigSource>>,
    converters: HashMap<TypeId, ConverterRegistration>,
    closed: AtomicBool,
}

impl ConfigImpl {
    /// 创建配置对象
    ///
    /// `sources` 必须已按优先级排好序，`converters` 中每个类型只保留一个转换器。
    pub fn new(
        sources: Vec<Arc<dyn ConfigSource>>,
        converters: HashMap<TypeId, ConverterRegistration>,
    ) -> Self {
        Self {
            sources,
            converters,
            closed: AtomicBool::new(false),
        }
    }

    /// 已知转换器数量
    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }
}

impl Config for ConfigImpl {
    fn get_raw_value(&self, key: &str) -> Option<String> {
        if self.is_closed() {
            return None;
        }

        self.sources.iter().find_map(|source| {
            let value = source.get_value(key)?;
            trace!("配置 {} 由 {} 提供", key, source.name());
            Some(value)
        })
    }

    fn property_names(&self) -> Vec<String> {
        if self.is_closed() {
            return Vec::new();
        }

        let names: BTreeSet<String> = self
            .sources
            .iter()
            .flat_map(|source| source.property_names())
            .collect();
        names.into_iter().collect()
    }

    fn config_sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        self.sources.clone()
    }

    fn convert_raw(
        &self,
        key: &str,
        raw: &str,
        type_id: TypeId,
        type_name: &'static str,
    ) -> ConfigResult<Box<dyn Any + Send>> {
        if self.is_closed() {
            return Err(ConfigError::Closed);
        }

        let converter = self
            .converters
            .get(&type_id)
            .ok_or_else(|| ConfigError::ConverterNotFound {
                type_name: type_name.to_string(),
            })?;

        converter.convert(raw).map_err(|e| match e {
            ConfigError::TypeConversionError { type_name, message, .. } => {
                ConfigError::conversion(key, type_name, message)
            }
            other => other,
        })
    }

    fn as_closeable(&self) -> Option<&dyn Closeable> {
        Some(self)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Closeable for ConfigImpl {
    fn close(&self) -> Result<(), BoxError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        debug!("关闭配置，配置源数量: {}", self.sources.len());

        let mut first_error = None;
        for source in &self.sources {
            if let Some(closeable) = source.as_closeable() {
                if let Err(e) = closeable.close() {
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for ConfigImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigImpl")
            .field("sources", &self.sources)
            .field("converters", &self.converters.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
