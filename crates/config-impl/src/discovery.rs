//! 配置源与转换器的发现机制
//!
//! 其他模块在启动时把配置源工厂和转换器登记到 [`Discovery`]，
//! 构建器在 `add_discovered_sources` / `add_discovered_converters`
//! 步骤中取出。进程级实例见 [`Discovery::global`]。

use config_abstractions::{ConfigSource, ConverterRegistration};
use config_common::OwnerContext;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 配置源工厂，按所属上下文产出配置源
pub type SourceFactory = Arc<dyn Fn(&OwnerContext) -> Vec<Arc<dyn ConfigSource>> + Send + Sync>;

static GLOBAL_DISCOVERY: Lazy<Arc<Discovery>> = Lazy::new(|| Arc::new(Discovery::new()));

/// 发现注册表
#[derive(Default)]
pub struct Discovery {
    source_factories: RwLock<Vec<SourceFactory>>,
    converters: RwLock<Vec<ConverterRegistration>>,
}

impl Discovery {
    /// 创建空的发现注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级发现注册表
    pub fn global() -> Arc<Self> {
        GLOBAL_DISCOVERY.clone()
    }

    /// 登记配置源工厂
    pub fn register_source_factory<F>(&self, factory: F)
    where
        F: Fn(&OwnerContext) -> Vec<Arc<dyn ConfigSource>> + Send + Sync + 'static,
    {
        self.source_factories.write().push(Arc::new(factory));
        debug!("登记配置源工厂");
    }

    /// 登记固定的配置源，对所有上下文生效
    pub fn register_source(&self, source: Arc<dyn ConfigSource>) {
        debug!("登记配置源: {}", source.name());
        self.register_source_factory(move |_| vec![source.clone()]);
    }

    /// 登记转换器
    pub fn register_converter(&self, converter: ConverterRegistration) {
        debug!("登记转换器: {}", converter.type_name);
        self.converters.write().push(converter);
    }

    /// 为指定上下文发现配置源
    pub fn discover_sources(&self, context: &OwnerContext) -> Vec<Arc<dyn ConfigSource>> {
        // 先复制工厂列表，避免在持锁期间回调外部代码
        let factories: Vec<SourceFactory> = self.source_factories.read().clone();
        factories
            .iter()
            .flat_map(|factory| factory(context))
            .collect()
    }

    /// 已登记的转换器
    pub fn discover_converters(&self) -> Vec<ConverterRegistration> {
        self.converters.read().clone()
    }

    /// 清空全部登记
    pub fn clear(&self) {
        self.source_factories.write().clear();
        self.converters.write().clear();
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("source_factories", &self.source_factories.read().len())
            .field("converters", &self.converters.read().len())
            .finish()
    }
}
