//! 内置类型转换器

use config_abstractions::ConverterRegistration;
use config_common::{ConfigError, ConfigResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 内置转换器的优先级，低于默认优先级以便被覆盖
pub const BUILTIN_CONVERTER_PRIORITY: i32 = 1;

fn parse<T>(raw: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::conversion(raw, std::any::type_name::<T>(), e.to_string()))
}

/// 解析布尔值，接受 `true/false/yes/no/on/off/1/0`，不区分大小写
pub fn parse_bool(raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::conversion(raw, "bool", "无法识别的布尔值")),
    }
}

/// 解析时长
///
/// 纯整数按毫秒计，也接受 `ms`、`s`、`m`、`h` 后缀。
pub fn parse_duration(raw: &str) -> ConfigResult<Duration> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: u64 = digits
        .parse()
        .map_err(|_| ConfigError::conversion(raw, "Duration", "缺少数值"))?;

    let scaled = |factor: u64| {
        amount
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::conversion(raw, "Duration", "数值溢出"))
    };

    match unit.trim() {
        "" | "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => scaled(60),
        "h" => scaled(3600),
        other => Err(ConfigError::conversion(
            raw,
            "Duration",
            format!("未知的时间单位: {other}"),
        )),
    }
}

fn parse_char(raw: &str) -> ConfigResult<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::conversion(raw, "char", "需要恰好一个字符")),
    }
}

/// 全部内置转换器
pub fn builtin_converters() -> Vec<ConverterRegistration> {
    let p = BUILTIN_CONVERTER_PRIORITY;
    vec![
        ConverterRegistration::with_priority(
            |raw: &str| -> ConfigResult<String> { Ok(raw.to_string()) },
            p,
        ),
        ConverterRegistration::with_priority(parse_bool, p),
        ConverterRegistration::with_priority(parse::<i32>, p),
        ConverterRegistration::with_priority(parse::<i64>, p),
        ConverterRegistration::with_priority(parse::<u16>, p),
        ConverterRegistration::with_priority(parse::<u32>, p),
        ConverterRegistration::with_priority(parse::<u64>, p),
        ConverterRegistration::with_priority(parse::<usize>, p),
        ConverterRegistration::with_priority(parse::<f32>, p),
        ConverterRegistration::with_priority(parse::<f64>, p),
        ConverterRegistration::with_priority(parse_char, p),
        ConverterRegistration::with_priority(parse_duration, p),
        ConverterRegistration::with_priority(
            |raw: &str| -> ConfigResult<PathBuf> { Ok(PathBuf::from(raw)) },
            p,
        ),
    ]
}
