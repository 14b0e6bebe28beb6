//! 日志级别
//!
//! 级别是一个有符号整数：数值越大优先级越高。`DEBUG` 以下的负数级别
//! 对应详细度（verbosity）请求，`V(n)` 映射为 `Level(-n)`。

use crate::error::LogzError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i8);

impl Level {
    pub const DEBUG: Level = Level(-1);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(1);
    pub const ERROR: Level = Level(2);
    /// 调用方误用等"不变量被破坏"的记录级别，开发模式下输出后 panic
    pub const DPANIC: Level = Level(3);
    pub const PANIC: Level = Level(4);
    pub const FATAL: Level = Level(5);

    pub const fn new(value: i8) -> Self {
        Level(value)
    }

    /// 将详细度映射到引擎级别：`V(0)` 为 info，`V(1)` 为 debug，依此类推。
    ///
    /// 超出级别表示范围（大于 128）时返回 None。
    pub fn from_verbosity(verbosity: u32) -> Option<Self> {
        i8::try_from(-i64::from(verbosity)).ok().map(Level)
    }

    pub const fn value(self) -> i8 {
        self.0
    }

    /// 大写名称，用于编码输出
    pub fn capital_name(self) -> String {
        match self {
            Level::DEBUG => "DEBUG".to_string(),
            Level::INFO => "INFO".to_string(),
            Level::WARN => "WARN".to_string(),
            Level::ERROR => "ERROR".to_string(),
            Level::DPANIC => "DPANIC".to_string(),
            Level::PANIC => "PANIC".to_string(),
            Level::FATAL => "FATAL".to_string(),
            Level(other) => format!("LEVEL({})", other),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Level::DEBUG => f.write_str("debug"),
            Level::INFO => f.write_str("info"),
            Level::WARN => f.write_str("warn"),
            Level::ERROR => f.write_str("error"),
            Level::DPANIC => f.write_str("dpanic"),
            Level::PANIC => f.write_str("panic"),
            Level::FATAL => f.write_str("fatal"),
            Level(other) => write!(f, "Level({})", other),
        }
    }
}

impl FromStr for Level {
    type Err = LogzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "debug" => Ok(Level::DEBUG),
            "info" | "" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            "dpanic" => Ok(Level::DPANIC),
            "panic" => Ok(Level::PANIC),
            "fatal" => Ok(Level::FATAL),
            _ => trimmed
                .parse::<i8>()
                .map(Level)
                .map_err(|_| LogzError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level(-2),
            tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

/// 可在运行时修改的最低级别，由同一次构建派生出的所有引擎共享
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicI8>,
}

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicI8::new(level.value())),
        }
    }

    pub fn level(&self) -> Level {
        Level(self.inner.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.inner.store(level.value(), Ordering::Relaxed);
    }

    /// 当前配置下 `level` 是否输出
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}
