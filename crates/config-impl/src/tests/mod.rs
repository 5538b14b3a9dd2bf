//! 配置注册表单元测试


use config_abstractions::{Config, ConfigBuilder, ConfigSource, ConverterRegistration};
use config_common::{BoxError, Closeable, ConfigError, ConfigResult, OwnerContext};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 测试用配置对象，记录关闭次数
pub(crate) struct TestConfig {
    pub name: String,
    pub closes: AtomicUsize,
    pub fail_close: bool,
}

impl TestConfig {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            closes: AtomicUsize::new(0),
            fail_close: false,
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            closes: AtomicUsize::new(0),
            fail_close: true,
        })
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Config for TestConfig {
    fn get_raw_value(&self, key: &str) -> Option<String> {
        (key == "name").then(|| self.name.clone())
    }

    fn property_names(&self) -> Vec<String> {
        vec!["name".to_string()]
    }

    fn config_sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        Vec::new()
    }

    fn convert_raw(
        &self,
        _key: &str,
        raw: &str,
        type_id: TypeId,
        type_name: &'static str,
    ) -> ConfigResult<Box<dyn Any + Send>> {
        if type_id == TypeId::of::<String>() {
            Ok(Box::new(raw.to_string()))
        } else {
            Err(ConfigError::ConverterNotFound {
                type_name: type_name.to_string(),
            })
        }
    }

    fn as_closeable(&self) -> Option<&dyn Closeable> {
        Some(self)
    }
}

impl Closeable for TestConfig {
    fn close(&self) -> Result<(), BoxError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err("close failed".into())
        } else {
            Ok(())
        }
    }
}

/// 不可关闭的配置对象
pub(crate) struct PlainConfig;

impl Config for PlainConfig {
    fn get_raw_value(&self, _key: &str) -> Option<String> {
        None
    }

    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn config_sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        Vec::new()
    }

    fn convert_raw(
        &self,
        _key: &str,
        _raw: &str,
        _type_id: TypeId,
        type_name: &'static str,
    ) -> ConfigResult<Box<dyn Any + Send>> {
        Err(ConfigError::ConverterNotFound {
            type_name: type_name.to_string(),
        })
    }
}

/// 构建器调用记录
#[derive(Default)]
pub(crate) struct BuildLog {
    pub steps: Mutex<Vec<String>>,
    pub builds: AtomicUsize,
}

impl BuildLog {
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

/// 记录调用顺序的测试构建器
pub(crate) struct RecordingBuilder {
    log: Arc<BuildLog>,
    context: Option<OwnerContext>,
    delay: Duration,
    fail: bool,
}

impl RecordingBuilder {
    pub fn factory(log: Arc<BuildLog>) -> impl Fn() -> Box<dyn ConfigBuilder> + Send + Sync {
        Self::factory_with(log, Duration::ZERO, false)
    }

    pub fn factory_with(
        log: Arc<BuildLog>,
        delay: Duration,
        fail: bool,
    ) -> impl Fn() -> Box<dyn ConfigBuilder> + Send + Sync {
        move || {
            Box::new(RecordingBuilder {
                log: log.clone(),
                context: None,
                delay,
                fail,
            }) as Box<dyn ConfigBuilder>
        }
    }

    fn record(&self, step: &str) {
        self.log.steps.lock().push(step.to_string());
    }
}

impl ConfigBuilder for RecordingBuilder {
    fn for_context(mut self: Box<Self>, context: &OwnerContext) -> Box<dyn ConfigBuilder> {
        self.record("for_context");
        self.context = Some(context.clone());
        self
    }

    fn add_default_sources(self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.record("add_default_sources");
        self
    }

    fn add_discovered_sources(self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.record("add_discovered_sources");
        self
    }

    fn add_discovered_converters(self: Box<Self>) -> Box<dyn ConfigBuilder> {
        self.record("add_discovered_converters");
        self
    }

    fn with_sources(self: Box<Self>, _sources: Vec<Arc<dyn ConfigSource>>) -> Box<dyn ConfigBuilder> {
        self.record("with_sources");
        self
    }

    fn with_converters(
        self: Box<Self>,
        _converters: Vec<ConverterRegistration>,
    ) -> Box<dyn ConfigBuilder> {
        self.record("with_converters");
        self
    }

    fn build(self: Box<Self>) -> ConfigResult<Arc<dyn Config>> {
        self.record("build");
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail {
            return Err(ConfigError::construction("builder refused"));
        }

        self.log.builds.fetch_add(1, Ordering::SeqCst);
        let label = self
            .context
            .as_ref()
            .map_or_else(|| "unbound".to_string(), ToString::to_string);
        Ok(TestConfig::new(&label) as Arc<dyn Config>)
    }
}
