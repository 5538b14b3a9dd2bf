//! # Configuration Implementation
//!
//! 配置注册表的具体实现，以及一套可直接使用的默认协作者。
//!
//! ## 主要组件
//!
//! - [`DefaultConfigProvider`] - 按所属上下文缓存配置实例的注册表
//! - [`DefaultConfigBuilder`] - 默认配置构建器
//! - [`ConfigImpl`] - 默认配置对象
//! - [`MapConfigSource`] / [`EnvConfigSource`] / [`TomlConfigSource`] - 配置源
//! - [`Discovery`] - 配置源与转换器的发现注册表
//! - [`ConfigProvider`] - 进程级访问门面

pub mod builder;
pub mod config;
pub mod converters;
pub mod discovery;
pub mod global;
pub mod provider;
pub mod sources;

pub use builder::*;
pub use config::*;
pub use converters::*;
pub use discovery::*;
pub use global::*;
pub use provider::*;
pub use sources::*;

#[cfg(test)]
mod tests;
