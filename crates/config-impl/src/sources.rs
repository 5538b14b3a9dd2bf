//! 配置源实现

use config_abstractions::{ConfigSource, CONFIG_ORDINAL, DEFAULT_ORDINAL};
use config_common::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 环境变量配置源的默认序数
pub const ENV_ORDINAL: i32 = 300;

/// 内存配置源
///
/// 常用于测试和程序内覆盖配置。
#[derive(Debug, Clone)]
pub struct MapConfigSource {
    name: String,
    ordinal: i32,
    properties: HashMap<String, String>,
}

impl MapConfigSource {
    /// 创建新的内存配置源
    ///
    /// 序数取 `config_ordinal` 属性，缺失时为默认序数。
    pub fn new<K, V>(name: impl Into<String>, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let properties: HashMap<String, String> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let ordinal = properties
            .get(CONFIG_ORDINAL)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_ORDINAL);

        Self {
            name: name.into(),
            ordinal,
            properties,
        }
    }

    /// 设置序数
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.properties.clone()
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }
}

/// 环境变量配置源
///
/// 创建时对进程环境变量做快照。查找顺序：原始键、将非字母数字字符
/// 替换为 `_` 的键、再转为大写的键，例如 `server.port` 依次尝试
/// `server.port`、`server_port`、`SERVER_PORT`。
#[derive(Debug, Clone)]
pub struct EnvConfigSource {
    prefix: String,
    ordinal: i32,
    env_vars: HashMap<String, String>,
}

impl EnvConfigSource {
    /// 读取全部环境变量
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// 只读取指定前缀的环境变量，键中不含前缀
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let env_vars: HashMap<String, String> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix.as_str())
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), value))
            })
            .collect();

        debug!("加载了 {} 个环境变量，前缀: {:?}", env_vars.len(), prefix);

        Self {
            prefix,
            ordinal: ENV_ORDINAL,
            env_vars,
        }
    }

    /// 设置序数
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// 环境变量前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn sanitize(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl Default for EnvConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvConfigSource {
    fn name(&self) -> &str {
        "EnvConfigSource"
    }

    fn get_value(&self, key: &str) -> Option<String> {
        if let Some(value) = self.env_vars.get(key) {
            return Some(value.clone());
        }

        let sanitized = Self::sanitize(key);
        if let Some(value) = self.env_vars.get(&sanitized) {
            return Some(value.clone());
        }

        self.env_vars.get(&sanitized.to_uppercase()).cloned()
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.env_vars.clone()
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }
}

/// TOML 文件配置源
///
/// 嵌套表展开为点分隔的键，数组按 `,` 拼接。
#[derive(Debug, Clone)]
pub struct TomlConfigSource {
    name: String,
    file_path: PathBuf,
    ordinal: i32,
    properties: HashMap<String, String>,
}

impl TomlConfigSource {
    /// 从文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        debug!("加载 TOML 配置文件: {}", file_path.display());

        let content =
            std::fs::read_to_string(&file_path).map_err(|e| ConfigError::FileReadError {
                path: file_path.display().to_string(),
                source: e,
            })?;

        let mut source = Self::from_toml_str(&file_path.display().to_string(), &content)?;
        source.file_path = file_path;
        Ok(source)
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(name: &str, content: &str) -> ConfigResult<Self> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;

        let mut properties = HashMap::new();
        Self::flatten(&table, "", &mut properties);

        let ordinal = properties
            .get(CONFIG_ORDINAL)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_ORDINAL);

        debug!("TOML 配置加载完成: {} ({} 个键)", name, properties.len());

        Ok(Self {
            name: format!("TomlConfigSource[{name}]"),
            file_path: PathBuf::from(name),
            ordinal,
            properties,
        })
    }

    /// 文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn flatten(table: &toml::Table, prefix: &str, out: &mut HashMap<String, String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            match value {
                toml::Value::Table(nested) => Self::flatten(nested, &full_key, out),
                other => {
                    out.insert(full_key, Self::render(other));
                }
            }
        }
    }

    fn render(value: &toml::Value) -> String {
        match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
            toml::Value::Array(items) => items
                .iter()
                .map(Self::render)
                .collect::<Vec<_>>()
                .join(","),
            table @ toml::Value::Table(_) => table.to_string(),
        }
    }
}

impl ConfigSource for TomlConfigSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.properties.clone()
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }
}
