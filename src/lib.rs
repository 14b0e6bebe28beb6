//! logz - 分级结构化日志门面
//!
//! logz 为诊断日志提供统一的调用接口：六个严重级别、任意数量的详细度级别，
//! 以及三种调用形式（结构化字段、格式化字符串、扁平键值对）。
//! 实际的编码与输出由可替换的 [`Engine`] 完成，内置实现为 [`CoreEngine`]。
//!
//! # 快速开始
//!
//! ```rust
//! use logz::{args, Field};
//!
//! logz::info("service started", &[Field::int("port", 8080)]);
//! logz::warnw("disk low", &args!["path", "/data", "free_mb", 512]);
//! logz::infof!("loaded {} plugins", 3);
//!
//! // 详细度越高越啰嗦；未启用时返回共享的空日志器
//! logz::v(2).info("cache miss", &[]);
//!
//! logz::flush();
//! ```
//!
//! # 自定义配置
//!
//! ```rust
//! use logz::{InfoLogger, LogConfig, Logger, OutputFormat};
//!
//! let config = LogConfig {
//!     level: "debug".to_string(),
//!     format: OutputFormat::Json,
//!     name: "api".to_string(),
//!     ..Default::default()
//! };
//!
//! let logger = Logger::new(config)?;
//! let db = logger.with_name("db").with_values(&logz::args!["shard", 3]);
//! db.info("connected", &[]);
//! # Ok::<(), logz::LogzError>(())
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod diagnostics;
pub mod env_config;
pub mod error;
pub mod global;
pub mod logger;
mod macros;

// 重新导出主要类型
pub use config::{
    load_config_from_file, load_config_from_str, validate_config, LogConfig, OutputFormat,
    SamplingConfig,
};
pub use context::{from_context, Context, LOGGER_KEY};
pub use diagnostics::{get_diagnostics, DiagnosticsSnapshot};
pub use env_config::EnvConfig;
pub use error::{LogzError, Result};

// 重新导出核心功能
pub use crate::core::engine::{CoreEngine, Engine, Entry};
pub use crate::core::field::{Arg, Field};
pub use crate::core::layers::redirect::{redirect_std_log, RedirectLayer};
pub use crate::core::level::{AtomicLevel, Level};
pub use crate::core::sink::{LogSink, MemorySink};
pub use logger::info::{InfoLogger, LeveledLogger, NoopLogger};
pub use logger::{LevelWriter, Logger};

// 默认日志器的包级函数
pub use global::{
    debug, debugf, debugw, dpanic, dpanicf, dpanicw, error, errorf, errorw, fatal, fatalf,
    fatalw, flush, info, infof, infow, init, panic, panicf, panicw, std_err_writer,
    std_info_writer, v, warn, warnf, warnw, with_context, with_name, with_values,
};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 常用类型
pub mod prelude {
    pub use crate::core::field::{Arg, Field};
    pub use crate::core::level::Level;
    pub use crate::logger::info::InfoLogger;
    pub use crate::logger::Logger;
    pub use crate::{args, LogConfig, OutputFormat};
}
