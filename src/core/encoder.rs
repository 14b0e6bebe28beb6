//! 记录编码器
//!
//! 支持两种输出编码：每行一个 JSON 对象，或制表符分隔的 console 格式。

use crate::config::OutputFormat;
use crate::core::event::Record;
use crate::core::level::Level;
use crate::diagnostics;
use crate::error::Result;
use colored::Colorize;
use serde_json::{Map, Value};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const MESSAGE_KEY: &str = "message";
const LEVEL_KEY: &str = "level";
const TIME_KEY: &str = "timestamp";
const NAME_KEY: &str = "logger";
const CALLER_KEY: &str = "caller";
const STACKTRACE_KEY: &str = "stacktrace";

/// 记录自身使用的键，同名字段会加上 [`RENAMED_FIELD_PREFIX`] 前缀输出
pub const RESERVED_KEYS: [&str; 6] = [
    LEVEL_KEY,
    TIME_KEY,
    NAME_KEY,
    CALLER_KEY,
    MESSAGE_KEY,
    STACKTRACE_KEY,
];
pub const RENAMED_FIELD_PREFIX: &str = "fields.";

/// 记录编码器
#[derive(Debug, Clone)]
pub struct Encoder {
    format: OutputFormat,
    colored: bool,
}

impl Encoder {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self {
            format,
            colored: colored && format == OutputFormat::Console,
        }
    }

    /// 编码一条记录，结果以换行结尾
    pub fn encode(&self, record: &Record) -> Result<String> {
        let mut line = match self.format {
            OutputFormat::Json => self.encode_json(record)?,
            OutputFormat::Console => self.encode_console(record)?,
        };
        line.push('\n');
        Ok(line)
    }

    fn encode_json(&self, record: &Record) -> Result<String> {
        let mut object = Map::new();
        object.insert(
            LEVEL_KEY.to_string(),
            Value::String(record.level.capital_name()),
        );
        object.insert(
            TIME_KEY.to_string(),
            Value::String(record.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        );
        if let Some(ref name) = record.logger {
            object.insert(NAME_KEY.to_string(), Value::String(name.clone()));
        }
        if let Some(ref caller) = record.caller {
            object.insert(CALLER_KEY.to_string(), Value::String(caller.clone()));
        }
        object.insert(
            MESSAGE_KEY.to_string(),
            Value::String(record.message.clone()),
        );
        let mut collisions = 0u64;
        for field in &record.fields {
            if RESERVED_KEYS.contains(&field.key.as_str()) {
                collisions += 1;
                object.insert(
                    format!("{}{}", RENAMED_FIELD_PREFIX, field.key),
                    field.value.clone(),
                );
            } else {
                object.insert(field.key.clone(), field.value.clone());
            }
        }
        if collisions > 0 {
            diagnostics::record(|d| d.add_field_key_collisions(collisions));
        }
        if let Some(ref stack) = record.stacktrace {
            object.insert(STACKTRACE_KEY.to_string(), Value::String(stack.clone()));
        }
        Ok(serde_json::to_string(&Value::Object(object))?)
    }

    fn encode_console(&self, record: &Record) -> Result<String> {
        let mut columns = vec![
            record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.format_level(record.level),
        ];
        if let Some(ref name) = record.logger {
            columns.push(name.clone());
        }
        if let Some(ref caller) = record.caller {
            columns.push(caller.clone());
        }
        columns.push(record.message.clone());
        if !record.fields.is_empty() {
            columns.push(serde_json::to_string(&record.fields_object())?);
        }

        let mut line = columns.join("\t");
        if let Some(ref stack) = record.stacktrace {
            line.push('\n');
            line.push_str(stack.trim_end());
        }
        Ok(line)
    }

    fn format_level(&self, level: Level) -> String {
        let name = level.capital_name();
        if !self.colored {
            return name;
        }
        match level {
            Level::DEBUG => name.magenta().to_string(),
            Level::INFO => name.blue().to_string(),
            Level::WARN => name.yellow().to_string(),
            Level::ERROR | Level::DPANIC | Level::PANIC | Level::FATAL => name.red().to_string(),
            _ => name.cyan().to_string(),
        }
    }
}
