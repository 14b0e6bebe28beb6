//! 定义 logz 日志门面的配置结构体。
//!
//! `LogConfig` 在构建日志器时被消费一次，之后不再修改。

use crate::core::level::Level;
use serde::Deserialize;

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_level() -> String {
    "info".to_string()
}
fn default_false() -> bool {
    false
}
fn default_output_paths() -> Vec<String> {
    vec!["stdout".to_string()]
}
fn default_error_output_paths() -> Vec<String> {
    vec!["stderr".to_string()]
}
fn default_format() -> OutputFormat {
    OutputFormat::Console
}
fn default_sampling() -> Option<SamplingConfig> {
    Some(SamplingConfig::default())
}
fn default_sampling_initial() -> u64 {
    100
}
fn default_sampling_thereafter() -> u64 {
    100
}

/// 输出编码
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 人类可读的制表符分隔格式
    #[default]
    Console,
    /// 每行一个 JSON 对象
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// 采样配置：每秒内同一级别、同一消息的前 `initial` 条全部输出，
/// 之后每 `thereafter` 条输出一条。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    #[serde(default = "default_sampling_initial")]
    pub initial: u64,
    #[serde(default = "default_sampling_thereafter")]
    pub thereafter: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            initial: default_sampling_initial(),
            thereafter: default_sampling_thereafter(),
        }
    }
}

/// logz 的顶层配置结构体。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// 最低输出级别，无法解析时回退到 info
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// 仅在 console 格式下生效
    #[serde(default = "default_false")]
    pub enable_color: bool,
    /// 开发模式：DPANIC 级别的记录在输出后会触发 panic
    #[serde(default = "default_false")]
    pub development: bool,
    #[serde(default = "default_false")]
    pub disable_stacktrace: bool,
    #[serde(default = "default_false")]
    pub disable_caller: bool,
    #[serde(default = "default_output_paths")]
    pub output_paths: Vec<String>,
    #[serde(default = "default_error_output_paths")]
    pub error_output_paths: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_sampling")]
    pub sampling: Option<SamplingConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            enable_color: default_false(),
            development: default_false(),
            disable_stacktrace: default_false(),
            disable_caller: default_false(),
            output_paths: default_output_paths(),
            error_output_paths: default_error_output_paths(),
            name: String::new(),
            sampling: default_sampling(),
        }
    }
}

impl LogConfig {
    /// 解析配置中的级别文本，失败时回退到 `Level::INFO`。
    pub fn parsed_level(&self) -> Level {
        match self.level.parse::<Level>() {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(error = %e, "unrecognized log level, falling back to info");
                Level::INFO
            }
        }
    }

    /// 彩色输出只在 console 格式下生效
    pub fn color_enabled(&self) -> bool {
        self.enable_color && self.format == OutputFormat::Console
    }
}

/// 用于从 TOML 文件加载 `LogConfig` 的辅助函数。
pub fn load_config_from_file(path: &std::path::Path) -> crate::error::Result<LogConfig> {
    use crate::error::LogzError;
    use std::fs;

    if !path.exists() {
        return Err(LogzError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = fs::read_to_string(path)?;
    load_config_from_str(&config_str)
}

/// 用于从 TOML 字符串加载 `LogConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> crate::error::Result<LogConfig> {
    let config: LogConfig = toml::from_str(config_str)?;
    Ok(config)
}

/// 验证配置的有效性。
///
/// 级别文本不参与校验：无法解析的级别在构建时回退到 info。
pub fn validate_config(config: &LogConfig) -> crate::error::Result<()> {
    use crate::error::LogzError;

    if config.output_paths.is_empty() {
        return Err(LogzError::ConfigError("输出路径列表不能为空".to_string()));
    }

    for path in config
        .output_paths
        .iter()
        .chain(config.error_output_paths.iter())
    {
        if path.trim().is_empty() {
            return Err(LogzError::InvalidPath("输出路径不能为空".to_string()));
        }
    }

    if let Some(ref sampling) = config.sampling {
        if sampling.thereafter == 0 {
            return Err(LogzError::ConfigError(
                "采样 thereafter 必须大于0".to_string(),
            ));
        }
    }

    Ok(())
}
