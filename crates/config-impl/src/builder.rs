//! 默认配置构建器

use crate::config::ConfigImpl;
use crate::converters::builtin_converters;
use crate::discovery::Discovery;
use crate::sources::{EnvConfigSource, TomlConfigSource};
use config_abstractions::{Config, ConfigBuilder, ConfigSource, ConverterRegistration};
use config_common::{ConfigError, ConfigResult, OwnerContext};
use std::any::TypeId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// 指定默认 TOML 配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "CONFIG_REGISTRY_FILE";

/// 默认 TOML 配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "config/application.toml";

/// 默认配置构建器
///
/// 配置源按序数从高到低排序；序数相同时先添加的配置源优先。
/// 转换器按优先级选取，内置转换器优先级最低。
pub struct DefaultConfigBuilder {
    context: Option<OwnerContext>,
    discovery: Arc<Discovery>,
    default_file: Option<PathBuf>,
    add_defaults: bool,
    add_discovered_sources: bool,
    add_discovered_converters: bool,
    sources: Vec<Arc<dyn ConfigSource>>,
    converters: Vec<ConverterRegistration>,
}

impl DefaultConfigBuilder {
    /// 使用进程级发现注册表创建构建器
    pub fn new() -> Self {
        Self::with_discovery(Discovery::global())
    }

    /// 使用指定的发现注册表创建构建器
    pub fn with_discovery(discovery: Arc<Discovery>) -> Self {
        Self {
            context: None,
            discovery,
            default_file: None,
            add_defaults: false,
            add_discovered_sources: false,
            add_discovered_converters: false,
            sources: Vec::new(),
            converters: Vec::new(),
        }
    }

    /// 覆盖默认 TOML 配置文件路径
    pub fn with_default_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_file = Some(path.into());
        self
    }

    fn default_file_path(&self) -> PathBuf {
        self.default_file
            .clone()
            .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    fn default_sources(&self) -> ConfigResult<Vec<Arc<dyn ConfigSource>>> {
        let mut sources: Vec<Arc<dyn ConfigSource>> = vec![Arc::new(EnvConfigSource::new())];

        // 只有文件不存在时跳过，其他无法访问的情况按读取失败处理
        let path = self.default_file_path();
        match std::fs::metadata(&path) {
            Ok(_) => sources.push(Arc::new(TomlConfigSource::from_file(&path)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("默认配置文件不存在，跳过: {}", path.display());
            }
            Err(e) => {
                return Err(ConfigError::FileReadError {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        }

        Ok(sources)
    }

    /// 按类型选出生效的转换器，优先级相同时后登记的生效
    fn select_converters(
        converters: Vec<ConverterRegistration>,
    ) -> HashMap<TypeId, ConverterRegistration> {
        let mut selected: HashMap<TypeId, ConverterRegistration> = HashMap::new();
        for converter in converters {
            match selected.get(&converter.type_id) {
                Some(existing) if existing.priority > converter.priority => {}
                _ => {
                    selected.insert(converter.type_id, converter);
                }
            }
        }
        selected
    }
}

impl Default for DefaultConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder for DefaultConfigBuilder {
    fn for_context(mut self: Box<Self>, context: &OwnerContext) -> Box<dyn ConfigBuilder> {
        self.context = Some(context.clone());
        self
    }

    fn add_default_sources(mut self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.add_defaults = true;
        self
    }

    fn add_discovered_sources(mut self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.add_discovered_sources = true;
        self
    }

    fn add_discovered_converters(mut self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.add_discovered_converters = true;
        self
    }

    fn with_sources(mut self: Box<Self>, sources: Vec<Arc<dyn ConfigSource>>) -> Box<dyn ConfigBuilder> {
        self.sources.extend(sources);
        self
    }

    fn with_converters(
        mut self: Box<Self>,
        converters: Vec<ConverterRegistration>,
    ) -> Box<dyn ConfigBuilder> {
        self.converters.extend(converters);
        self
    }

    fn build(self: Box<Self>) -> ConfigResult<Arc<dyn Config>> {
        let context = self.context.clone().unwrap_or_else(OwnerContext::root);
        debug!("构建配置: {}", context);

        let mut sources = Vec::new();
        if self.add_defaults {
            sources.extend(self.default_sources()?);
        }
        if self.add_discovered_sources {
            sources.extend(self.discovery.discover_sources(&context));
        }
        sources.extend(self.sources.iter().cloned());

        // 稳定排序，序数相同时保持添加顺序
        sources.sort_by_key(|source| std::cmp::Reverse(source.ordinal()));

        let mut converters = builtin_converters();
        if self.add_discovered_converters {
            converters.extend(self.discovery.discover_converters());
        }
        converters.extend(self.converters);

        let converters = Self::select_converters(converters);

        debug!(
            "配置构建完成: {}，配置源 {} 个，转换器 {} 个",
            context,
            sources.len(),
            converters.len()
        );

        Ok(Arc::new(ConfigImpl::new(sources, converters)))
    }
}

impl std::fmt::Debug for DefaultConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultConfigBuilder")
            .field("context", &self.context)
            .field("default_file", &self.default_file)
            .field("add_defaults", &self.add_defaults)
            .field("add_discovered_sources", &self.add_discovered_sources)
            .field("add_discovered_converters", &self.add_discovered_converters)
            .field("sources", &self.sources.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}
