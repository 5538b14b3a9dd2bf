//! Integration tests for the config registry across crates
use config_abstractions::{
    same_instance, Config, ConfigBuilder, ConfigExt, ConfigProviderResolver,
};
use config_common::{ConfigError, OwnerContext};
use config_impl::{
    ConfigProvider, DefaultConfigBuilder, DefaultConfigProvider, Discovery, MapConfigSource,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 使用独立发现注册表和临时配置文件的注册表
fn provider_with(discovery: Arc<Discovery>, file: &std::path::Path) -> DefaultConfigProvider {
    let file = file.to_path_buf();
    DefaultConfigProvider::new().with_builder_factory(move || {
        Box::new(
            DefaultConfigBuilder::with_discovery(discovery.clone()).with_default_file(file.clone()),
        ) as Box<dyn ConfigBuilder>
    })
}

#[test]
fn test_default_builder_end_to_end() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "config_ordinal = 100\n[server]\nport = 8080\nname = \"file\"")?;

    let discovery = Arc::new(Discovery::new());
    discovery.register_source(Arc::new(
        MapConfigSource::new("overrides", [("server.name", "override")]).with_ordinal(500),
    ));

    let provider = provider_with(discovery, file.path());
    let ctx = OwnerContext::new("service");
    let config = provider.get_config(Some(&ctx))?;

    assert_eq!(config.get_value::<u16>("server.port")?, 8080);
    assert_eq!(config.get_value::<String>("server.name")?, "override");
    assert!(config.property_names().contains(&"server.port".to_string()));

    provider.shutdown()?;
    assert!(provider.is_empty());
    assert!(matches!(
        config.get_value::<u16>("server.port"),
        Err(ConfigError::Closed)
    ));
    Ok(())
}

#[test]
fn test_build_failure_leaves_registry_untouched() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "broken = = file").unwrap();

    let provider = provider_with(Arc::new(Discovery::new()), file.path());
    let ctx = OwnerContext::new("broken");

    let result = provider.get_config(Some(&ctx));
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    assert!(!provider.contains(&ctx));
}

#[test]
fn test_release_and_rebuild_yields_fresh_instance() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "generation = 1").unwrap();
    let provider = provider_with(Arc::new(Discovery::new()), file.path());
    let ctx = OwnerContext::new("cycle");

    let first = provider.get_config(Some(&ctx)).unwrap();
    provider.release_config(Some(&first)).unwrap();
    let second = provider.get_config(Some(&ctx)).unwrap();

    assert!(!same_instance(&first, &second));
    // 已释放的实例已关闭
    assert_eq!(first.get_raw_value("generation"), None);
    assert_eq!(second.get_value::<u32>("generation").unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_tasks_share_one_instance() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let provider = Arc::new(DefaultConfigProvider::new().with_builder_factory(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::new(
            DefaultConfigBuilder::with_discovery(Arc::new(Discovery::new()))
                .with_default_file("/nonexistent/application.toml"),
        ) as Box<dyn ConfigBuilder>
    }));
    let ctx = OwnerContext::new("parallel");

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let provider = provider.clone();
            let ctx = ctx.clone();
            tokio::task::spawn_blocking(move || provider.get_config(Some(&ctx)))
        })
        .collect();

    let mut configs: Vec<Arc<dyn Config>> = Vec::new();
    for handle in handles {
        configs.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(configs.iter().all(|c| same_instance(c, &configs[0])));
}

#[test]
fn test_global_facade_scopes_by_ambient_context() {
    let tenant = OwnerContext::new("tenant");

    let ambient = {
        let _guard = tenant.enter();
        ConfigProvider::get_config().unwrap()
    };
    let explicit = ConfigProvider::get_config_for(&tenant).unwrap();

    assert!(same_instance(&ambient, &explicit));

    let resolver = config_impl::resolver_instance();
    resolver.release_config(Some(&explicit)).unwrap();

    let rebuilt = ConfigProvider::get_config_for(&tenant).unwrap();
    assert!(!same_instance(&rebuilt, &explicit));
    resolver.release_config(Some(&rebuilt)).unwrap();
}
