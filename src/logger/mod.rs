//! 完整能力的日志器
//!
//! [`Logger`] 提供 debug/info/warn/error/dpanic/panic/fatal 六个级别
//! 以及三种调用形式（结构化、格式化、键值），并支持派生：附加字段、
//! 追加名称、绑定到上下文、获取详细度门控的子日志器。
//!
//! ```rust
//! use logz::{args, Field, InfoLogger, LogConfig, Logger};
//!
//! let logger = Logger::new(LogConfig::default())?;
//! logger.warn("disk low", &[Field::string("path", "/data")]);
//! logger.infow("request served", &args!["status", 200, "route", "/health"]);
//! logger.v(2).infof(format_args!("cache entries: {}", 42));
//! # Ok::<(), logz::LogzError>(())
//! ```

pub mod info;

use crate::config::LogConfig;
use crate::context::{Context, LOGGER_KEY};
use crate::core::engine::{CoreEngine, Engine, Entry};
use crate::core::field::{handle_fields, Arg, Field};
use crate::core::level::Level;
use crate::diagnostics;
use crate::error::Result;
use info::{gate, log_fields, log_fmt, log_kv, InfoLogger, LeveledLogger};
use std::fmt;
use std::io;
use std::sync::Arc;

/// 完整能力的日志器，克隆开销很小，可在线程间共享
#[derive(Debug, Clone)]
pub struct Logger {
    engine: Arc<dyn Engine>,
    info: LeveledLogger,
}

impl Logger {
    /// 根据配置构建日志器；输出目标无法打开时返回错误
    pub fn new(config: LogConfig) -> Result<Self> {
        let engine = CoreEngine::build(&config)?;
        Ok(Self::from_engine(Arc::new(engine)))
    }

    /// 包装一个已有引擎，info 调用的默认级别为 `Level::INFO`
    pub fn from_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            info: LeveledLogger::new(Level::INFO, engine.clone()),
            engine,
        }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        log_fields(self.engine.as_ref(), Level::DEBUG, msg, fields);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        log_fmt(self.engine.as_ref(), Level::DEBUG, args);
    }

    #[track_caller]
    pub fn debugw(&self, msg: &str, keys_and_values: &[Arg]) {
        log_kv(self.engine.as_ref(), Level::DEBUG, msg, keys_and_values);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        log_fields(self.engine.as_ref(), Level::WARN, msg, fields);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        log_fmt(self.engine.as_ref(), Level::WARN, args);
    }

    #[track_caller]
    pub fn warnw(&self, msg: &str, keys_and_values: &[Arg]) {
        log_kv(self.engine.as_ref(), Level::WARN, msg, keys_and_values);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        log_fields(self.engine.as_ref(), Level::ERROR, msg, fields);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        log_fmt(self.engine.as_ref(), Level::ERROR, args);
    }

    #[track_caller]
    pub fn errorw(&self, msg: &str, keys_and_values: &[Arg]) {
        log_kv(self.engine.as_ref(), Level::ERROR, msg, keys_and_values);
    }

    /// 输出后仅在开发模式下 panic
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        log_fields(self.engine.as_ref(), Level::DPANIC, msg, fields);
        self.escalate_dpanic(msg);
    }

    #[track_caller]
    pub fn dpanicf(&self, args: fmt::Arguments<'_>) {
        let msg = fmt::format(args);
        log_fields(self.engine.as_ref(), Level::DPANIC, &msg, &[]);
        self.escalate_dpanic(&msg);
    }

    #[track_caller]
    pub fn dpanicw(&self, msg: &str, keys_and_values: &[Arg]) {
        log_kv(self.engine.as_ref(), Level::DPANIC, msg, keys_and_values);
        self.escalate_dpanic(msg);
    }

    /// 输出后无条件 panic
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        log_fields(self.engine.as_ref(), Level::PANIC, msg, fields);
        panic!("{}", msg);
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = fmt::format(args);
        log_fields(self.engine.as_ref(), Level::PANIC, &msg, &[]);
        panic!("{}", msg);
    }

    #[track_caller]
    pub fn panicw(&self, msg: &str, keys_and_values: &[Arg]) -> ! {
        log_kv(self.engine.as_ref(), Level::PANIC, msg, keys_and_values);
        panic!("{}", msg);
    }

    /// 输出并刷新后无条件终止进程
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        log_fields(self.engine.as_ref(), Level::FATAL, msg, fields);
        self.terminate()
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        log_fmt(self.engine.as_ref(), Level::FATAL, args);
        self.terminate()
    }

    #[track_caller]
    pub fn fatalw(&self, msg: &str, keys_and_values: &[Arg]) -> ! {
        log_kv(self.engine.as_ref(), Level::FATAL, msg, keys_and_values);
        self.terminate()
    }

    #[track_caller]
    fn escalate_dpanic(&self, msg: &str) {
        if self.engine.development() {
            panic!("{}", msg);
        }
    }

    fn terminate(&self) -> ! {
        self.flush();
        std::process::exit(1)
    }

    /// 返回详细度为 `verbosity` 的 info 日志器，数值越大越详细
    pub fn v(&self, verbosity: u32) -> Arc<dyn InfoLogger> {
        gate(&self.engine, verbosity)
    }

    /// 派生一个为每条记录附加给定键值对的日志器
    #[track_caller]
    pub fn with_values(&self, keys_and_values: &[Arg]) -> Logger {
        let fields = handle_fields(self.engine.as_ref(), keys_and_values, &[]);
        Logger::from_engine(self.engine.with_fields(fields))
    }

    /// 派生一个名称追加了 `name` 的日志器
    pub fn with_name(&self, name: &str) -> Logger {
        Logger::from_engine(self.engine.named(name))
    }

    /// 返回绑定了该日志器的上下文副本，原上下文不变
    pub fn with_context(&self, ctx: &Context) -> Context {
        ctx.with_shared(LOGGER_KEY, Arc::new(self.clone()))
    }

    /// 刷新引擎缓冲；同步失败只计入诊断，不返回给调用方
    pub fn flush(&self) {
        if self.engine.sync().is_err() {
            diagnostics::record(|d| d.increment_sync_failures());
        }
    }

    /// 返回一个在固定级别记录每次写入的 `io::Write` 适配器
    pub fn writer_at(&self, level: Level) -> LevelWriter {
        LevelWriter {
            engine: self.engine.clone(),
            level,
        }
    }

    fn write_message(&self, buf: &[u8]) {
        write_at(self.engine.as_ref(), Level::INFO, buf);
    }
}

impl InfoLogger for Logger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        self.info.info(msg, fields);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        self.info.infof(args);
    }

    #[track_caller]
    fn infow(&self, msg: &str, keys_and_values: &[Arg]) {
        self.info.infow(msg, keys_and_values);
    }

    fn enabled(&self) -> bool {
        self.info.enabled()
    }
}

fn write_at(engine: &dyn Engine, level: Level, buf: &[u8]) {
    if !engine.enabled(level) {
        return;
    }
    let text = String::from_utf8_lossy(buf);
    let message = text
        .strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(&text);
    engine.emit(Entry::new(level, message).with_caller(None), Vec::new());
}

/// 将字节序列作为预格式化的 info 消息；总是报告写入了全部字节
impl io::Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_message(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self);
        Ok(())
    }
}

impl io::Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_message(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self);
        Ok(())
    }
}

/// 固定级别的写入适配器
#[derive(Debug, Clone)]
pub struct LevelWriter {
    engine: Arc<dyn Engine>,
    level: Level,
}

impl LevelWriter {
    pub fn level(&self) -> Level {
        self.level
    }
}

impl io::Write for LevelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_at(self.engine.as_ref(), self.level, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.engine.sync().is_err() {
            diagnostics::record(|d| d.increment_sync_failures());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, SamplingConfig};
    use crate::context::from_context;
    use crate::core::sink::MemorySink;
    use serde_json::json;
    use std::io::Write;

    fn logger_with(config: LogConfig) -> (Logger, MemorySink) {
        let out = MemorySink::new();
        let engine = CoreEngine::with_sinks(&config, vec![Arc::new(out.clone())], vec![]);
        (Logger::from_engine(Arc::new(engine)), out)
    }

    fn json_logger(level: &str) -> (Logger, MemorySink) {
        logger_with(LogConfig {
            level: level.to_string(),
            format: OutputFormat::Json,
            sampling: None,
            ..Default::default()
        })
    }

    #[test]
    fn test_all_severities_and_shapes() {
        let (logger, out) = json_logger("debug");
        logger.debug("d", &[]);
        logger.debugf(format_args!("d{}", 1));
        logger.debugw("dw", &[Arg::from("k"), Arg::from(1)]);
        logger.info("i", &[]);
        logger.infof(format_args!("i{}", 1));
        logger.infow("iw", &[Arg::from("k"), Arg::from(2)]);
        logger.warn("w", &[]);
        logger.warnf(format_args!("w{}", 1));
        logger.warnw("ww", &[Arg::from("k"), Arg::from(3)]);
        logger.error("e", &[]);
        logger.errorf(format_args!("e{}", 1));
        logger.errorw("ew", &[Arg::from("k"), Arg::from(4)]);
        logger.dpanic("dp", &[]);

        let levels: Vec<String> = out
            .json_lines()
            .iter()
            .map(|r| r["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            levels,
            vec![
                "DEBUG", "DEBUG", "DEBUG", "INFO", "INFO", "INFO", "WARN", "WARN", "WARN",
                "ERROR", "ERROR", "ERROR", "DPANIC"
            ]
        );
        assert_eq!(out.json_lines()[11]["k"], json!(4));
    }

    #[test]
    fn test_level_gate_rejects_lower_levels() {
        let (logger, out) = json_logger("warn");
        logger.info("ignored", &[]);
        logger.debugw("ignored", &[Arg::from("odd")]);
        assert!(out.contents().is_empty());

        logger.warn("disk low", &[Field::string("path", "/data")]);
        let records = out.json_lines();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "WARN");
        assert_eq!(records[0]["message"], "disk low");
        assert_eq!(records[0]["path"], "/data");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, out) = json_logger("info");
        logger.info("here", &[]);
        let caller = out.json_lines()[0]["caller"].as_str().unwrap().to_string();
        assert!(caller.starts_with("logger/mod.rs:"), "caller was {}", caller);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_emits_then_panics() {
        let (logger, _) = json_logger("fatal");
        logger.panic("boom", &[]);
    }

    #[test]
    fn test_panic_record_reaches_engine_first() {
        let (logger, out) = json_logger("info");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panicw("bad state", &[Arg::from("id"), Arg::from(7)]);
        }));
        assert!(result.is_err());
        let records = out.json_lines();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "PANIC");
        assert_eq!(records[0]["id"], json!(7));
        assert!(records[0].get("stacktrace").is_some());
    }

    #[test]
    fn test_dpanic_only_panics_in_development() {
        let (logger, out) = json_logger("info");
        logger.dpanicf(format_args!("invariant {}", "broken"));
        assert_eq!(out.json_lines()[0]["message"], "invariant broken");

        let (dev_logger, dev_out) = logger_with(LogConfig {
            format: OutputFormat::Json,
            development: true,
            ..Default::default()
        });
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dev_logger.dpanic("dev only", &[]);
        }));
        assert!(result.is_err());
        assert_eq!(dev_out.json_lines().len(), 1);
    }

    #[test]
    fn test_keyword_misuse_reports_one_diagnostic() {
        let (logger, out) = json_logger("info");
        logger.infow(
            "request",
            &[Arg::from("region"), Arg::from("us-east"), Arg::from("count")],
        );

        let records = out.json_lines();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["level"], "DPANIC");
        assert_eq!(records[0]["ignored key"], "count");
        assert_eq!(records[1]["message"], "request");
        assert_eq!(records[1]["region"], "us-east");
        assert!(records[1].get("count").is_none());
    }

    #[test]
    #[should_panic(expected = "odd number of arguments")]
    fn test_keyword_misuse_panics_in_development() {
        let (logger, _) = logger_with(LogConfig {
            development: true,
            ..Default::default()
        });
        logger.infow("m", &[Arg::from("lonely")]);
    }

    #[test]
    fn test_with_values_and_with_name_do_not_mutate_parent() {
        let (logger, out) = json_logger("info");
        let child = logger
            .with_values(&[Arg::from("request_id"), Arg::from("r-1")])
            .with_name("http");

        child.info("child", &[]);
        logger.info("parent", &[]);

        let records = out.json_lines();
        assert_eq!(records[0]["request_id"], "r-1");
        assert_eq!(records[0]["logger"], "http");
        assert!(records[1].get("request_id").is_none());
        assert!(records[1].get("logger").is_none());
    }

    #[test]
    fn test_with_name_accumulates() {
        let (logger, out) = json_logger("info");
        logger.with_name("a").with_name("b").warn("nested", &[]);
        assert_eq!(out.json_lines()[0]["logger"], "a.b");
    }

    #[test]
    fn test_verbosity_gate() {
        let (logger, out) = json_logger("debug");
        assert!(logger.v(0).enabled());
        assert!(logger.v(1).enabled());

        let disabled = logger.v(2);
        assert!(!disabled.enabled());
        disabled.info("never", &[]);
        assert!(out.contents().is_empty());

        logger.v(1).infow("verbose", &[Arg::from("step"), Arg::from(1)]);
        assert_eq!(out.json_lines()[0]["level"], "DEBUG");
    }

    #[test]
    fn test_with_context_binds_logger() {
        let (logger, out) = json_logger("info");
        let ctx = Context::new();
        let bound = logger.with_name("req").with_context(&ctx);

        assert!(from_context(&ctx).is_none());
        let retrieved = from_context(&bound).unwrap();
        retrieved.info("from context", &[]);
        assert_eq!(out.json_lines()[0]["logger"], "req");
    }

    #[test]
    fn test_write_adapter() {
        let (mut logger, out) = json_logger("info");
        let written = logger.write(b"plain line\n").unwrap();
        assert_eq!(written, 11);
        logger.flush();
        (&logger).write_all(b"second").unwrap();

        let records = out.json_lines();
        assert_eq!(records[0]["message"], "plain line");
        assert_eq!(records[0]["level"], "INFO");
        assert!(records[0].get("caller").is_none());
        assert_eq!(records[1]["message"], "second");
    }

    #[test]
    fn test_write_reports_full_length_when_disabled() {
        let (mut logger, out) = json_logger("error");
        assert_eq!(logger.write(b"dropped").unwrap(), 7);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_level_writer() {
        let (logger, out) = json_logger("info");
        let mut writer = logger.writer_at(Level::ERROR);
        writeln!(writer, "legacy failure {}", 3).unwrap();
        assert_eq!(writer.level(), Level::ERROR);

        let records = out.json_lines();
        assert_eq!(records[0]["level"], "ERROR");
        assert_eq!(records[0]["message"], "legacy failure 3");
    }

    #[test]
    fn test_sampling_applies_to_logger_calls() {
        let (logger, out) = logger_with(LogConfig {
            format: OutputFormat::Json,
            sampling: Some(SamplingConfig {
                initial: 2,
                thereafter: 1000,
            }),
            ..Default::default()
        });
        for _ in 0..5 {
            logger.info("same", &[]);
        }
        assert_eq!(out.lines().len(), 2);
    }
}
