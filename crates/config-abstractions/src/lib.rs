//! # Configuration Abstractions
//!
//! 配置注册表抽象层，定义注册表与外部协作者之间的契约。
//!
//! ## 核心接口
//!
//! - [`Config`] - 已构建的配置对象
//! - [`ConfigSource`] - 配置源接口
//! - [`Converter`] - 字符串到目标类型的转换器
//! - [`ConfigBuilder`] - 配置构建协议
//! - [`ConfigProviderResolver`] - 按上下文管理配置实例的注册表接口

pub mod builder;
pub mod config;
pub mod converter;
pub mod resolver;
pub mod source;

pub use builder::*;
pub use config::*;
pub use converter::*;
pub use resolver::*;
pub use source::*;
