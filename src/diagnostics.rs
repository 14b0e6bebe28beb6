//! 定义 logz 的内部诊断与指标。
//!
//! 被吞掉的失败（同步失败、输出写入失败）以及采样丢弃和调用方误用
//! 不会返回给调用方，但会在这里计数，便于观察日志系统本身的健康状况。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// 内部诊断与指标数据结构。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 系统启动时间
    start_time: Option<Instant>,

    /// 已写出的记录数
    records_written: AtomicU64,

    /// 因采样被丢弃的记录数
    records_sampled: AtomicU64,

    /// 键值参数误用的诊断次数
    misuse_reports: AtomicU64,

    /// 输出目标写入或编码失败次数
    sink_errors: AtomicU64,

    /// Flush 时被吞掉的同步失败次数
    sync_failures: AtomicU64,

    /// 与记录保留键同名而被改名输出的字段数
    field_key_collisions: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    pub uptime: Option<Duration>,
    pub records_written: u64,
    pub records_sampled: u64,
    pub misuse_reports: u64,
    pub sink_errors: u64,
    pub sync_failures: u64,
    pub field_key_collisions: u64,
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn increment_records_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_sampled(&self) {
        self.records_sampled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misuse_reports(&self) {
        self.misuse_reports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sink_errors(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sync_failures(&self) {
        self.sync_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_field_key_collisions(&self, count: u64) {
        self.field_key_collisions.fetch_add(count, Ordering::Relaxed);
    }

    /// 获取诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            uptime: self.start_time.map(|start| start.elapsed()),
            records_written: self.records_written.load(Ordering::Relaxed),
            records_sampled: self.records_sampled.load(Ordering::Relaxed),
            misuse_reports: self.misuse_reports.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
            sync_failures: self.sync_failures.load(Ordering::Relaxed),
            field_key_collisions: self.field_key_collisions.load(Ordering::Relaxed),
        }
    }
}

/// 全局诊断实例
static GLOBAL_DIAGNOSTICS: OnceLock<Arc<Diagnostics>> = OnceLock::new();

/// 初始化（或获取已有的）全局诊断实例。
pub fn init_diagnostics() -> Arc<Diagnostics> {
    GLOBAL_DIAGNOSTICS
        .get_or_init(|| Arc::new(Diagnostics::new()))
        .clone()
}

/// 获取当前诊断快照
pub fn get_diagnostics() -> DiagnosticsSnapshot {
    init_diagnostics().snapshot()
}

/// 在全局诊断实例上记录一次事件
pub(crate) fn record<F: FnOnce(&Diagnostics)>(f: F) {
    f(GLOBAL_DIAGNOSTICS.get_or_init(|| Arc::new(Diagnostics::new())));
}
