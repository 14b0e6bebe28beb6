//! 环境变量配置模块
//!
//! 此模块提供从 `LOGZ_*` 环境变量覆盖 `LogConfig` 的功能。

use crate::config::{LogConfig, OutputFormat};
use std::env;

/// 环境变量配置管理器
pub struct EnvConfig;

impl EnvConfig {
    pub const LEVEL: &'static str = "LOGZ_LEVEL";
    pub const FORMAT: &'static str = "LOGZ_FORMAT";
    pub const ENABLE_COLOR: &'static str = "LOGZ_ENABLE_COLOR";
    pub const DEVELOPMENT: &'static str = "LOGZ_DEVELOPMENT";
    pub const DISABLE_STACKTRACE: &'static str = "LOGZ_DISABLE_STACKTRACE";
    pub const DISABLE_CALLER: &'static str = "LOGZ_DISABLE_CALLER";
    pub const OUTPUT_PATHS: &'static str = "LOGZ_OUTPUT_PATHS";
    pub const ERROR_OUTPUT_PATHS: &'static str = "LOGZ_ERROR_OUTPUT_PATHS";
    pub const NAME: &'static str = "LOGZ_NAME";

    /// 读取非空字符串变量
    pub fn get_string(key: &str) -> Option<String> {
        env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// 读取布尔变量，接受 true/false/1/0/yes/no
    pub fn get_bool(key: &str) -> Option<bool> {
        let raw = Self::get_string(key)?;
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                tracing::warn!(key, value = other, "ignoring non-boolean environment override");
                None
            }
        }
    }

    /// 读取逗号分隔的路径列表
    pub fn get_list(key: &str) -> Option<Vec<String>> {
        let raw = Self::get_string(key)?;
        let items: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }

    /// 将环境变量中存在的覆盖项应用到配置上
    pub fn apply(mut config: LogConfig) -> LogConfig {
        if let Some(level) = Self::get_string(Self::LEVEL) {
            config.level = level;
        }
        if let Some(format) = Self::get_string(Self::FORMAT) {
            match format.parse::<OutputFormat>() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!(error = %e, "ignoring LOGZ_FORMAT override"),
            }
        }
        if let Some(value) = Self::get_bool(Self::ENABLE_COLOR) {
            config.enable_color = value;
        }
        if let Some(value) = Self::get_bool(Self::DEVELOPMENT) {
            config.development = value;
        }
        if let Some(value) = Self::get_bool(Self::DISABLE_STACKTRACE) {
            config.disable_stacktrace = value;
        }
        if let Some(value) = Self::get_bool(Self::DISABLE_CALLER) {
            config.disable_caller = value;
        }
        if let Some(paths) = Self::get_list(Self::OUTPUT_PATHS) {
            config.output_paths = paths;
        }
        if let Some(paths) = Self::get_list(Self::ERROR_OUTPUT_PATHS) {
            config.error_output_paths = paths;
        }
        if let Some(name) = Self::get_string(Self::NAME) {
            config.name = name;
        }
        config
    }
}

impl LogConfig {
    /// 默认配置叠加环境变量覆盖
    pub fn from_env() -> Self {
        EnvConfig::apply(LogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_env_config_overrides() {
        env::set_var("LOGZ_TEST_BOOL", "yes");
        env::set_var("LOGZ_TEST_LIST", "stdout, /tmp/a.log ,,");
        env::set_var("LOGZ_TEST_EMPTY", "   ");

        assert_eq!(EnvConfig::get_bool("LOGZ_TEST_BOOL"), Some(true));
        assert_eq!(
            EnvConfig::get_list("LOGZ_TEST_LIST"),
            Some(vec!["stdout".to_string(), "/tmp/a.log".to_string()])
        );
        assert_eq!(EnvConfig::get_string("LOGZ_TEST_EMPTY"), None);

        env::remove_var("LOGZ_TEST_BOOL");
        env::remove_var("LOGZ_TEST_LIST");
        env::remove_var("LOGZ_TEST_EMPTY");
    }

    #[test]
    fn test_apply_overrides_present_keys() {
        env::set_var(EnvConfig::FORMAT, "json");
        env::set_var(EnvConfig::NAME, "worker");
        env::set_var(EnvConfig::ERROR_OUTPUT_PATHS, "stdout");

        let config = LogConfig::from_env();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.name, "worker");
        assert_eq!(config.error_output_paths, vec!["stdout".to_string()]);
        assert_eq!(config.output_paths, vec!["stdout".to_string()]);

        env::remove_var(EnvConfig::FORMAT);
        env::remove_var(EnvConfig::NAME);
        env::remove_var(EnvConfig::ERROR_OUTPUT_PATHS);
    }

    #[test]
    fn test_env_config_invalid_bool_is_ignored() {
        env::set_var("LOGZ_TEST_BAD_BOOL", "maybe");
        assert_eq!(EnvConfig::get_bool("LOGZ_TEST_BAD_BOOL"), None);
        env::remove_var("LOGZ_TEST_BAD_BOOL");
    }
}
