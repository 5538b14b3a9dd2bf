//! 默认配置注册表实现
//!
//! [`DefaultConfigProvider`] 把所属上下文映射到已构建的配置实例。
//!
//! - 命中缓存的读取不加锁，直接查询并发映射
//! - 未命中时进入注册表唯一的互斥区并再次检查，保证每个上下文只构建一次
//! - 注册、释放（移除加关闭）和整体关闭都在同一互斥区内执行
//! - 互斥区可重入：构建过程中可以再次调用注册表获取其他上下文的配置，
//!   但在构建某个上下文时再次获取同一上下文会无限递归
//!
//! 映射对上下文持强引用：调用方需要显式调用 `release_config`，
//! 否则实例会一直保留到 [`DefaultConfigProvider::shutdown`] 或进程结束。

use crate::builder::DefaultConfigBuilder;
use config_abstractions::{same_instance, Config, ConfigBuilder, ConfigProviderResolver};
use config_common::{
    ConfigError, ConfigResult, ContextResolver, OwnerContext, ThreadContextResolver,
};
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// 构建器工厂
pub type BuilderFactory = Arc<dyn Fn() -> Box<dyn ConfigBuilder> + Send + Sync>;

fn default_builder() -> Box<dyn ConfigBuilder> {
    Box::new(DefaultConfigBuilder::new())
}

/// 默认配置注册表
pub struct DefaultConfigProvider {
    /// 上下文到配置实例的映射
    configs: DashMap<OwnerContext, Arc<dyn Config>>,
    /// 注册表唯一的互斥区，同一线程可重入
    lock: ReentrantMutex<()>,
    /// 构建器工厂
    builder_factory: BuilderFactory,
    /// 环境上下文解析器
    resolver: Arc<dyn ContextResolver>,
    /// 没有环境上下文时的回退上下文
    fallback: OwnerContext,
}

impl DefaultConfigProvider {
    /// 创建使用默认构建器和线程环境上下文的空注册表
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
            lock: ReentrantMutex::new(()),
            builder_factory: Arc::new(default_builder),
            resolver: Arc::new(ThreadContextResolver),
            fallback: OwnerContext::root(),
        }
    }

    /// 设置构建器工厂
    pub fn with_builder_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ConfigBuilder> + Send + Sync + 'static,
    {
        self.builder_factory = Arc::new(factory);
        self
    }

    /// 设置环境上下文解析器
    pub fn with_resolver(mut self, resolver: Arc<dyn ContextResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// 设置回退上下文
    pub fn with_fallback_context(mut self, context: OwnerContext) -> Self {
        self.fallback = context;
        self
    }

    /// 回退上下文
    pub fn fallback_context(&self) -> &OwnerContext {
        &self.fallback
    }

    /// 上下文是否已有配置
    pub fn contains(&self, context: &OwnerContext) -> bool {
        self.configs.contains_key(context)
    }

    /// 已注册的上下文数量
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// 所有已注册的上下文
    pub fn contexts(&self) -> Vec<OwnerContext> {
        self.configs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 关闭注册表
    ///
    /// 清空全部映射，对每个不同的实例调用一次 `close`。所有实例都会被尝试关闭，
    /// 返回遇到的第一个失败。
    pub fn shutdown(&self) -> ConfigResult<()> {
        let _guard = self.lock.lock();

        let contexts = self.contexts();
        let mut released: Vec<Arc<dyn Config>> = Vec::with_capacity(contexts.len());
        for context in contexts {
            if let Some((_, config)) = self.configs.remove(&context) {
                if !released.iter().any(|seen| same_instance(seen, &config)) {
                    released.push(config);
                }
            }
        }

        info!("关闭配置注册表，释放 {} 个配置实例", released.len());

        let mut first_error = None;
        for config in &released {
            if let Err(e) = Self::close_instance(config) {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn resolve_context(&self, context: Option<&OwnerContext>) -> OwnerContext {
        context
            .cloned()
            .or_else(|| self.resolver.current())
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn existing_config(&self, context: &OwnerContext) -> Option<Arc<dyn Config>> {
        self.configs.get(context).map(|entry| entry.value().clone())
    }

    fn build_config(&self, context: &OwnerContext) -> ConfigResult<Arc<dyn Config>> {
        (self.builder_factory)()
            .for_context(context)
            .add_default_sources()
            .add_discovered_sources()
            .add_discovered_converters()
            .build()
    }

    fn close_instance(config: &Arc<dyn Config>) -> ConfigResult<()> {
        match config.as_closeable() {
            Some(closeable) => closeable.close().map_err(ConfigError::cleanup),
            None => Ok(()),
        }
    }
}

impl Default for DefaultConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProviderResolver for DefaultConfigProvider {
    fn get_config(&self, context: Option<&OwnerContext>) -> ConfigResult<Arc<dyn Config>> {
        let context = self.resolve_context(context);

        if let Some(config) = self.existing_config(&context) {
            trace!("配置缓存命中: {}", context);
            return Ok(config);
        }

        let _guard = self.lock.lock();
        if let Some(config) = self.existing_config(&context) {
            trace!("配置已由并发调用构建: {}", context);
            return Ok(config);
        }

        let config = self.build_config(&context)?;
        self.configs.insert(context.clone(), config.clone());
        debug!("已为上下文构建配置: {}", context);

        Ok(config)
    }

    fn register_config(&self, config: Arc<dyn Config>, context: &OwnerContext) {
        let _guard = self.lock.lock();
        if self.configs.insert(context.clone(), config).is_some() {
            debug!("替换上下文的配置: {}", context);
        } else {
            debug!("注册上下文的配置: {}", context);
        }
    }

    fn release_config(&self, config: Option<&Arc<dyn Config>>) -> ConfigResult<()> {
        let target = match config {
            Some(config) => config.clone(),
            None => {
                let context = self.resolve_context(None);
                match self.existing_config(&context) {
                    Some(config) => config,
                    None => {
                        trace!("环境上下文没有配置，无需释放: {}", context);
                        return Ok(());
                    }
                }
            }
        };

        let _guard = self.lock.lock();

        let owner = self
            .configs
            .iter()
            .find(|entry| same_instance(entry.value(), &target))
            .map(|entry| entry.key().clone());

        let Some(owner) = owner else {
            trace!("配置实例未注册，忽略释放请求");
            return Ok(());
        };

        self.configs.remove(&owner);
        debug!("已释放上下文的配置: {}", owner);

        Self::close_instance(&target)
    }

    fn get_builder(&self) -> Box<dyn ConfigBuilder> {
        (self.builder_factory)()
    }
}

impl std::fmt::Debug for DefaultConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultConfigProvider")
            .field("contexts", &self.configs.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
