//! # Config Common
//!
//! 配置注册表的公共类型：错误定义、所属上下文标识和生命周期 trait。
//!
//! ## 核心组件
//!
//! - [`ConfigError`] - 配置相关错误
//! - [`OwnerContext`] - 配置实例的所属上下文标识
//! - [`ContextResolver`] - 当前（环境）上下文解析
//! - [`Closeable`] - 可释放资源的配置对象
//!
//! ## 设计原则
//!
//! - 上下文只作为身份标识使用，注册表从不检查其内部
//! - 错误同步返回给调用方，不在内部吞掉

pub mod context;
pub mod errors;
pub mod lifecycle;

pub use context::*;
pub use errors::*;
pub use lifecycle::*;
