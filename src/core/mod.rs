//! logz 核心模块
//!
//! 本模块包含级别模型、字段归一化、引擎边界及其内置实现（编码、输出目标、采样）。

pub mod encoder;
pub mod engine;
pub mod event;
pub mod field;
pub mod layers;
pub mod level;
pub mod sampler;
pub mod sink;

// 重新导出核心类型
pub use engine::{CallerInfo, CoreEngine, Engine, Entry};
pub use event::Record;
pub use field::{handle_fields, normalize, Arg, Field, Misuse, Normalized};
pub use level::{AtomicLevel, Level};
pub use sink::{LogSink, MemorySink};
