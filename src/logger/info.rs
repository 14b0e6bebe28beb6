//! 仅提供 info 能力的日志器
//!
//! [`InfoLogger`] 是详细度门控返回的能力集合。[`LeveledLogger`] 绑定一个
//! 级别和引擎句柄；[`NoopLogger`] 是无状态的共享空实现。

use crate::core::engine::{Engine, Entry};
use crate::core::field::{handle_fields, Arg, Field};
use crate::core::level::Level;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// 记录非错误日志的能力集合
pub trait InfoLogger: Send + Sync + fmt::Debug {
    /// 结构化调用：消息加预构建字段
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]);

    /// 格式化调用，仅在级别启用时才执行格式化
    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>);

    /// 键值调用：扁平的 `[key, value, ...]` 列表
    #[track_caller]
    fn infow(&self, msg: &str, keys_and_values: &[Arg]);

    /// 该日志器是否会真正输出
    fn enabled(&self) -> bool;
}

#[track_caller]
pub(crate) fn log_fields(engine: &dyn Engine, level: Level, msg: &str, fields: &[Field]) {
    if engine.enabled(level) {
        engine.emit(Entry::new(level, msg), fields.to_vec());
    }
}

#[track_caller]
pub(crate) fn log_fmt(engine: &dyn Engine, level: Level, args: fmt::Arguments<'_>) {
    if engine.enabled(level) {
        engine.emit(Entry::new(level, fmt::format(args)), Vec::new());
    }
}

#[track_caller]
pub(crate) fn log_kv(engine: &dyn Engine, level: Level, msg: &str, keys_and_values: &[Arg]) {
    if engine.enabled(level) {
        let fields = handle_fields(engine, keys_and_values, &[]);
        engine.emit(Entry::new(level, msg), fields);
    }
}

/// 绑定了级别的 info 日志器
#[derive(Debug, Clone)]
pub struct LeveledLogger {
    level: Level,
    engine: Arc<dyn Engine>,
}

impl LeveledLogger {
    pub fn new(level: Level, engine: Arc<dyn Engine>) -> Self {
        Self { level, engine }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl InfoLogger for LeveledLogger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        log_fields(self.engine.as_ref(), self.level, msg, fields);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        log_fmt(self.engine.as_ref(), self.level, args);
    }

    #[track_caller]
    fn infow(&self, msg: &str, keys_and_values: &[Arg]) {
        log_kv(self.engine.as_ref(), self.level, msg, keys_and_values);
    }

    fn enabled(&self) -> bool {
        true
    }
}

/// 所有操作都为空的 info 日志器
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl InfoLogger for NoopLogger {
    fn info(&self, _msg: &str, _fields: &[Field]) {}

    fn infof(&self, _args: fmt::Arguments<'_>) {}

    fn infow(&self, _msg: &str, _keys_and_values: &[Arg]) {}

    fn enabled(&self) -> bool {
        false
    }
}

static DISABLED_INFO_LOGGER: Lazy<Arc<dyn InfoLogger>> = Lazy::new(|| Arc::new(NoopLogger));

/// 共享的空日志器实例
pub fn disabled() -> Arc<dyn InfoLogger> {
    DISABLED_INFO_LOGGER.clone()
}

/// 详细度门控：`verbosity` 对应的级别启用时返回真实日志器，否则返回共享空日志器。
///
/// 判断只在调用时进行一次；返回的日志器不会随引擎级别变化而切换实现。
pub fn gate(engine: &Arc<dyn Engine>, verbosity: u32) -> Arc<dyn InfoLogger> {
    match Level::from_verbosity(verbosity) {
        Some(level) if engine.enabled(level) => Arc::new(LeveledLogger::new(level, engine.clone())),
        _ => disabled(),
    }
}
