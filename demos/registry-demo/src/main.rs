//! # 配置注册表演示
//!
//! 演示按上下文获取、注册和释放配置：
//! - 两个上下文各自构建独立的配置实例
//! - 环境上下文内不传上下文即可取到对应配置
//! - 释放后再次获取会重新构建

use clap::Parser;
use config_abstractions::{same_instance, ConfigExt, ConfigProviderResolver};
use config_common::OwnerContext;
use config_impl::{DefaultConfigBuilder, DefaultConfigProvider, Discovery, MapConfigSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 配置注册表演示
#[derive(Debug, Parser)]
#[command(name = "registry-demo", version)]
struct Args {
    /// 默认 TOML 配置文件
    #[arg(long, default_value = config_impl::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// 要读取的配置键
    #[arg(long = "key", default_value = "app.name")]
    keys: Vec<String>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let discovery = Arc::new(Discovery::new());
    discovery.register_source_factory(|ctx: &OwnerContext| {
        vec![Arc::new(MapConfigSource::new(
            "demo-defaults",
            [("app.name", "registry-demo"), ("app.owner", ctx.label())],
        )) as Arc<dyn config_abstractions::ConfigSource>]
    });

    let config_file = args.config.clone();
    let provider = DefaultConfigProvider::new().with_builder_factory(move || {
        Box::new(
            DefaultConfigBuilder::with_discovery(discovery.clone())
                .with_default_file(config_file.clone()),
        ) as Box<dyn config_abstractions::ConfigBuilder>
    });

    let orders = OwnerContext::new("orders");
    let billing = OwnerContext::new("billing");

    let orders_config = provider.get_config(Some(&orders))?;
    let billing_config = provider.get_config(Some(&billing))?;
    info!(
        "两个上下文的配置是否相同: {}",
        same_instance(&orders_config, &billing_config)
    );

    for key in &args.keys {
        let value = orders_config.get_optional_value::<String>(key)?;
        info!("[{}] {} = {:?}", orders, key, value);
    }

    {
        let _guard = billing.enter();
        let ambient = provider.get_config(None)?;
        info!(
            "环境上下文 {} 的 app.owner = {:?}",
            billing,
            ambient.get_optional_value::<String>("app.owner")?
        );
        provider.release_config(None)?;
    }

    let rebuilt = provider.get_config(Some(&billing))?;
    info!(
        "释放后重新构建: {}",
        !same_instance(&rebuilt, &billing_config)
    );

    provider.shutdown()?;
    info!("注册表已关闭，剩余上下文: {}", provider.len());
    Ok(())
}
