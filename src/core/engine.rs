//! 日志引擎
//!
//! [`Engine`] 是门面与实际输出之间的边界：门面只依赖级别检查、记录输出、
//! 同步以及两种派生操作。[`CoreEngine`] 是内置实现，负责编码、采样、
//! 调用位置与调用栈采集，并把记录写入配置的输出目标。

use crate::config::{validate_config, LogConfig};
use crate::core::encoder::{Encoder, TIMESTAMP_FORMAT};
use crate::core::event::{short_caller, Record};
use crate::core::field::Field;
use crate::core::level::{AtomicLevel, Level};
use crate::core::sampler::Sampler;
use crate::core::sink::{open_sinks, LogSink};
use crate::diagnostics;
use crate::error::{LogzError, Result};
use std::backtrace::Backtrace;
use std::fmt::Debug;
use std::panic::Location;
use std::sync::Arc;

/// 记录的调用位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerInfo {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static Location<'static>> for CallerInfo {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// 门面交给引擎的一条待输出记录
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub message: String,
    pub caller: Option<CallerInfo>,
}

impl Entry {
    /// 以调用方位置作为记录的调用位置
    #[track_caller]
    pub fn new<M: Into<String>>(level: Level, message: M) -> Self {
        Self {
            level,
            message: message.into(),
            caller: Some(CallerInfo::from(Location::caller())),
        }
    }

    pub fn with_caller(mut self, caller: Option<CallerInfo>) -> Self {
        self.caller = caller;
        self
    }
}

/// 结构化日志引擎
pub trait Engine: Send + Sync + Debug {
    /// `level` 在当前配置下是否输出
    fn enabled(&self, level: Level) -> bool;

    /// 输出一条记录，调用方应已完成级别检查
    fn emit(&self, entry: Entry, fields: Vec<Field>);

    /// 将缓冲的记录落盘
    fn sync(&self) -> Result<()>;

    /// 派生一个名称追加了 `segment` 的引擎
    fn named(&self, segment: &str) -> Arc<dyn Engine>;

    /// 派生一个为后续每条记录附加 `fields` 的引擎
    fn with_fields(&self, fields: Vec<Field>) -> Arc<dyn Engine>;

    /// 开发模式下 DPANIC 记录在输出后升级为 panic
    fn development(&self) -> bool {
        false
    }
}

#[derive(Debug)]
struct Shared {
    level: AtomicLevel,
    encoder: Encoder,
    outputs: Vec<Arc<dyn LogSink>>,
    error_outputs: Vec<Arc<dyn LogSink>>,
    sampler: Option<Sampler>,
    development: bool,
    add_caller: bool,
    add_stacktrace: bool,
}

impl Shared {
    /// 引擎内部错误写到错误输出，不返回给调用方
    fn report_error(&self, message: &str) {
        diagnostics::record(|d| d.increment_sink_errors());
        let line = format!(
            "{} logz internal error: {}\n",
            chrono::Utc::now().format(TIMESTAMP_FORMAT),
            message
        );
        for sink in &self.error_outputs {
            let _ = sink.write_record(line.as_bytes());
            let _ = sink.sync();
        }
    }
}

/// 内置引擎
#[derive(Debug, Clone)]
pub struct CoreEngine {
    shared: Arc<Shared>,
    name: Option<String>,
    context: Vec<Field>,
}

impl CoreEngine {
    /// 根据配置构建引擎，打开所有输出路径
    pub fn build(config: &LogConfig) -> Result<Self> {
        validate_config(config)?;
        let outputs = open_sinks(&config.output_paths)?;
        let error_outputs = open_sinks(&config.error_output_paths)?;
        Ok(Self::with_sinks(config, outputs, error_outputs))
    }

    /// 使用给定的输出目标构建引擎，忽略配置中的输出路径
    pub fn with_sinks(
        config: &LogConfig,
        outputs: Vec<Arc<dyn LogSink>>,
        error_outputs: Vec<Arc<dyn LogSink>>,
    ) -> Self {
        let shared = Shared {
            level: AtomicLevel::new(config.parsed_level()),
            encoder: Encoder::new(config.format, config.color_enabled()),
            outputs,
            error_outputs,
            sampler: config.sampling.as_ref().map(Sampler::new),
            development: config.development,
            add_caller: !config.disable_caller,
            add_stacktrace: !config.disable_stacktrace,
        };
        let name = Some(config.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self {
            shared: Arc::new(shared),
            name,
            context: Vec::new(),
        }
    }

    /// 共享的最低级别，修改后对所有派生引擎生效
    pub fn atomic_level(&self) -> AtomicLevel {
        self.shared.level.clone()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn build_record(&self, entry: Entry, fields: Vec<Field>) -> Record {
        let mut record = Record::new(entry.level, entry.message);
        record.logger = self.name.clone();
        if self.shared.add_caller {
            record.caller = entry
                .caller
                .map(|caller| short_caller(caller.file, caller.line));
        }
        record.fields = Vec::with_capacity(self.context.len() + fields.len());
        record.fields.extend_from_slice(&self.context);
        record.fields.extend(fields);
        if self.shared.add_stacktrace && entry.level >= Level::PANIC {
            record.stacktrace = Some(Backtrace::force_capture().to_string());
        }
        record
    }
}

impl Engine for CoreEngine {
    fn enabled(&self, level: Level) -> bool {
        self.shared.level.enabled(level)
    }

    fn emit(&self, entry: Entry, fields: Vec<Field>) {
        if let Some(ref sampler) = self.shared.sampler {
            if !sampler.check(entry.level, &entry.message) {
                diagnostics::record(|d| d.increment_records_sampled());
                return;
            }
        }

        let level = entry.level;
        let record = self.build_record(entry, fields);
        let line = match self.shared.encoder.encode(&record) {
            Ok(line) => line,
            Err(e) => {
                self.shared
                    .report_error(&format!("failed to encode record: {}", e));
                return;
            }
        };

        for sink in &self.shared.outputs {
            if let Err(e) = sink.write_record(line.as_bytes()) {
                self.shared
                    .report_error(&format!("write to {} failed: {}", sink.name(), e));
            }
        }
        diagnostics::record(|d| d.increment_records_written());

        if level > Level::ERROR {
            let _ = self.sync();
        }
    }

    fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self
            .shared
            .outputs
            .iter()
            .chain(self.shared.error_outputs.iter())
        {
            if let Err(e) = sink.sync() {
                first_error.get_or_insert(LogzError::sync(format!("{}: {}", sink.name(), e)));
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn named(&self, segment: &str) -> Arc<dyn Engine> {
        let mut derived = self.clone();
        if !segment.is_empty() {
            derived.name = Some(match self.name {
                Some(ref name) => format!("{}.{}", name, segment),
                None => segment.to_string(),
            });
        }
        Arc::new(derived)
    }

    fn with_fields(&self, fields: Vec<Field>) -> Arc<dyn Engine> {
        let mut derived = self.clone();
        derived.context.extend(fields);
        Arc::new(derived)
    }

    fn development(&self) -> bool {
        self.shared.development
    }
}
