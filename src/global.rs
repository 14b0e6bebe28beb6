//! 进程级默认日志器
//!
//! 默认日志器在首次使用时根据环境变量覆盖后的默认配置构建，
//! 构建后安装 `tracing` 重定向。[`init`] 在互斥保护下重新绑定默认实例，
//! 已经取出的日志器不受影响。

use crate::config::LogConfig;
use crate::context::{self, Context};
use crate::core::engine::Engine;
use crate::core::field::{Arg, Field};
use crate::core::layers::redirect::redirect_std_log;
use crate::core::level::Level;
use crate::error::Result;
use crate::logger::info::InfoLogger;
use crate::logger::{LevelWriter, Logger};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

static STD: OnceCell<RwLock<Logger>> = OnceCell::new();

fn cell() -> &'static RwLock<Logger> {
    let mut built = false;
    let cell = STD.get_or_init(|| {
        built = true;
        let logger = Logger::new(LogConfig::from_env())
            .unwrap_or_else(|e| panic!("logz: failed to build default logger: {}", e));
        RwLock::new(logger)
    });
    if built {
        redirect_std_log();
    }
    cell
}

/// 以给定配置重新初始化默认日志器；构建失败时保留原实例并返回错误
pub fn init(config: LogConfig) -> Result<()> {
    let logger = Logger::new(config)?;
    match STD.set(RwLock::new(logger)) {
        Ok(()) => {
            redirect_std_log();
        }
        Err(lock) => {
            let logger = lock.into_inner().unwrap_or_else(PoisonError::into_inner);
            *cell().write().unwrap_or_else(PoisonError::into_inner) = logger;
        }
    }
    tracing::debug!("default logger initialized");
    Ok(())
}

/// 返回当前默认日志器的副本
pub fn logger() -> Logger {
    cell()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 默认日志器的引擎；默认实例尚未构建或正在重新绑定时返回 None
pub(crate) fn current_engine() -> Option<Arc<dyn Engine>> {
    let lock = STD.get()?;
    let guard = lock.try_read().ok()?;
    Some(guard.engine().clone())
}

#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    logger().debug(msg, fields);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logger().debugf(args);
}

#[track_caller]
pub fn debugw(msg: &str, keys_and_values: &[Arg]) {
    logger().debugw(msg, keys_and_values);
}

#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    logger().info(msg, fields);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().infof(args);
}

#[track_caller]
pub fn infow(msg: &str, keys_and_values: &[Arg]) {
    logger().infow(msg, keys_and_values);
}

#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    logger().warn(msg, fields);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logger().warnf(args);
}

#[track_caller]
pub fn warnw(msg: &str, keys_and_values: &[Arg]) {
    logger().warnw(msg, keys_and_values);
}

#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    logger().error(msg, fields);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().errorf(args);
}

#[track_caller]
pub fn errorw(msg: &str, keys_and_values: &[Arg]) {
    logger().errorw(msg, keys_and_values);
}

#[track_caller]
pub fn dpanic(msg: &str, fields: &[Field]) {
    logger().dpanic(msg, fields);
}

#[track_caller]
pub fn dpanicf(args: fmt::Arguments<'_>) {
    logger().dpanicf(args);
}

#[track_caller]
pub fn dpanicw(msg: &str, keys_and_values: &[Arg]) {
    logger().dpanicw(msg, keys_and_values);
}

#[track_caller]
pub fn panic(msg: &str, fields: &[Field]) -> ! {
    logger().panic(msg, fields)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    logger().panicf(args)
}

#[track_caller]
pub fn panicw(msg: &str, keys_and_values: &[Arg]) -> ! {
    logger().panicw(msg, keys_and_values)
}

#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) -> ! {
    logger().fatal(msg, fields)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    logger().fatalf(args)
}

#[track_caller]
pub fn fatalw(msg: &str, keys_and_values: &[Arg]) -> ! {
    logger().fatalw(msg, keys_and_values)
}

pub fn v(verbosity: u32) -> Arc<dyn InfoLogger> {
    logger().v(verbosity)
}

#[track_caller]
pub fn with_values(keys_and_values: &[Arg]) -> Logger {
    logger().with_values(keys_and_values)
}

pub fn with_name(name: &str) -> Logger {
    logger().with_name(name)
}

pub fn with_context(ctx: &Context) -> Context {
    logger().with_context(ctx)
}

/// 取出上下文中绑定的日志器，未绑定时返回默认日志器
pub fn from_context(ctx: &Context) -> Arc<Logger> {
    context::from_context(ctx).unwrap_or_else(|| Arc::new(logger()))
}

pub fn flush() {
    logger().flush();
}

/// 在 ERROR 级别记录每次写入的适配器，用于接入只接受 `io::Write` 的旧代码
pub fn std_err_writer() -> LevelWriter {
    logger().writer_at(Level::ERROR)
}

/// 在 INFO 级别记录每次写入的适配器
pub fn std_info_writer() -> LevelWriter {
    logger().writer_at(Level::INFO)
}
