//! 错误类型定义

use thiserror::Error;

/// 外部错误的通用装箱类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {key} -> {type_name}, 原因: {message}")]
    TypeConversionError {
        key: String,
        type_name: String,
        message: String,
    },

    #[error("未找到类型转换器: {type_name}")]
    ConverterNotFound { type_name: String },

    #[error("配置文件读取失败: {path}, 原因: {source}")]
    FileReadError {
        path: String,
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置构建失败: {message}")]
    ConstructionFailed { message: String },

    #[error("Error while closing Config: {source}")]
    CleanupFailed { source: BoxError },

    #[error("配置已关闭")]
    Closed,
}

impl ConfigError {
    /// 创建键不存在错误
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// 创建类型转换错误
    pub fn conversion(
        key: impl Into<String>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::TypeConversionError {
            key: key.into(),
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 创建构建失败错误
    pub fn construction(message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            message: message.into(),
        }
    }

    /// 包装资源释放失败
    pub fn cleanup(source: BoxError) -> Self {
        Self::CleanupFailed { source }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
