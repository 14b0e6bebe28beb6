//! 将 `tracing` 事件转发到日志引擎的处理层
//!
//! 依赖方或本库自身通过 `tracing` 宏输出的日志，经由该层写入 logz 引擎，
//! 与门面调用产生的记录共享同一套编码和输出目标。

use crate::core::engine::{CallerInfo, Engine, Entry};
use crate::core::field::Field;
use crate::core::level::Level;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::field::Visit;
use tracing::{Event, Subscriber};
use tracing_core::subscriber::Interest;
use tracing_core::Metadata;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

static REDIRECT_INSTALLED: AtomicBool = AtomicBool::new(false);

/// 事件转发的目标
#[derive(Debug, Clone)]
pub enum RedirectTarget {
    /// 固定的引擎
    Fixed(Arc<dyn Engine>),
    /// 每次事件到达时的进程级默认日志器
    Default,
}

/// 转发 `tracing` 事件的处理层
#[derive(Debug, Clone)]
pub struct RedirectLayer {
    target: RedirectTarget,
}

impl RedirectLayer {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            target: RedirectTarget::Fixed(engine),
        }
    }

    /// 跟随 [`crate::global::init`] 的重新绑定
    pub fn to_default() -> Self {
        Self {
            target: RedirectTarget::Default,
        }
    }

    fn engine(&self) -> Option<Arc<dyn Engine>> {
        match self.target {
            RedirectTarget::Fixed(ref engine) => Some(engine.clone()),
            RedirectTarget::Default => crate::global::current_engine(),
        }
    }
}

struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl FieldVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            self.message = text;
        } else {
            self.push(field, Value::String(text));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        self.push(field, Value::String(value.to_string()));
    }
}

impl<S> Layer<S> for RedirectLayer
where
    S: Subscriber,
{
    // 默认日志器可能被重新初始化为不同级别，不缓存 callsite 的判断结果
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.engine()
            .map_or(false, |engine| engine.enabled(Level::from(*metadata.level())))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        let Some(engine) = self.engine() else {
            return;
        };
        if !engine.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: vec![Field::string("target", metadata.target())],
        };
        event.record(&mut visitor);

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(CallerInfo { file, line }),
            _ => None,
        };
        engine.emit(
            Entry::new(level, visitor.message).with_caller(caller),
            visitor.fields,
        );
    }
}

/// 将进程内的 `tracing` 事件重定向到默认日志器。
///
/// 只会安装一次；已有全局 subscriber 时静默放弃，返回是否由本次调用完成安装。
pub fn redirect_std_log() -> bool {
    install(RedirectLayer::to_default())
}

/// 将进程内的 `tracing` 事件重定向到指定引擎，规则同 [`redirect_std_log`]
pub fn redirect_std_log_to(engine: Arc<dyn Engine>) -> bool {
    install(RedirectLayer::new(engine))
}

fn install(layer: RedirectLayer) -> bool {
    if REDIRECT_INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }
    tracing_subscriber::registry().with(layer).try_init().is_ok()
}
