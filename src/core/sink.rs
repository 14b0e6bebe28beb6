//! 输出目标
//!
//! 输出路径支持 `stdout`、`stderr` 以及文件路径。文件通过
//! `tracing_appender` 的不轮转 appender 以追加方式打开。

use crate::error::{LogzError, Result};
use std::fmt::Debug;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// 日志输出目标，实现方需要自行串行化并发写入
pub trait LogSink: Send + Sync + Debug {
    /// 写入一条完整的编码记录
    fn write_record(&self, bytes: &[u8]) -> io::Result<()>;

    /// 将缓冲数据落盘
    fn sync(&self) -> io::Result<()>;

    /// 用于诊断输出的名称
    fn name(&self) -> String;
}

/// 标准输出
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(bytes)
    }

    fn sync(&self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn name(&self) -> String {
        "stdout".to_string()
    }
}

/// 标准错误
#[derive(Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(bytes)
    }

    fn sync(&self) -> io::Result<()> {
        io::stderr().flush()
    }

    fn name(&self) -> String {
        "stderr".to_string()
    }
}

/// 文件输出
pub struct FileSink {
    path: String,
    appender: Mutex<RollingFileAppender>,
}

impl Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink").field("path", &self.path).finish()
    }
}

impl FileSink {
    /// 打开（必要时创建）日志文件
    pub fn open(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LogzError::invalid_path(format!("缺少文件名: {}", path)))?;
        let directory = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(directory)
            .map_err(|e| LogzError::config(format!("无法打开日志文件 {}: {}", path, e)))?;

        tracing::debug!(path, "opened log file sink");
        Ok(Self {
            path: path.to_string(),
            appender: Mutex::new(appender),
        })
    }

    fn appender(&self) -> MutexGuard<'_, RollingFileAppender> {
        self.appender
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LogSink for FileSink {
    fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        self.appender().write_all(bytes)
    }

    fn sync(&self) -> io::Result<()> {
        self.appender().flush()
    }

    fn name(&self) -> String {
        self.path.clone()
    }
}

/// 内存输出，便于测试或嵌入场景读取已写出的记录
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// 已写出的全部内容
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    /// 按行拆分的记录
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// 将每行解析为 JSON（用于 json 编码）
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }
}

impl LogSink for MemorySink {
    fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        self.buffer().extend_from_slice(bytes);
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

/// 根据输出路径描述打开一组输出目标
pub fn open_sinks(paths: &[String]) -> Result<Vec<Arc<dyn LogSink>>> {
    let mut sinks: Vec<Arc<dyn LogSink>> = Vec::with_capacity(paths.len());
    for path in paths {
        let trimmed = path.trim();
        let sink: Arc<dyn LogSink> = match trimmed {
            "" => return Err(LogzError::invalid_path("输出路径不能为空")),
            "stdout" => Arc::new(StdoutSink),
            "stderr" => Arc::new(StderrSink),
            file => Arc::new(FileSink::open(file)?),
        };
        sinks.push(sink);
    }
    Ok(sinks)
}
