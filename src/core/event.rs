//! 日志记录定义
//!
//! `Record` 是引擎在通过级别检查与采样之后，交给编码器的完整记录。

use crate::core::field::Field;
use crate::core::level::Level;
use chrono::{DateTime, Utc};

/// 完整的日志记录
#[derive(Debug, Clone)]
pub struct Record {
    /// 记录时间戳
    pub timestamp: DateTime<Utc>,
    /// 日志级别
    pub level: Level,
    /// 日志器名称（以 `.` 分隔的层级）
    pub logger: Option<String>,
    /// 调用位置，形如 `dir/file.rs:42`
    pub caller: Option<String>,
    /// 日志消息
    pub message: String,
    /// 结构化字段：先是日志器上绑定的字段，再是本次调用的字段
    pub fields: Vec<Field>,
    /// 调用栈
    pub stacktrace: Option<String>,
}

impl Record {
    pub fn new(level: Level, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: None,
            caller: None,
            message,
            fields: Vec::new(),
            stacktrace: None,
        }
    }

    /// 字段的 JSON 对象表示，同名键以后出现者为准
    pub fn fields_object(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.fields.len());
        for field in &self.fields {
            map.insert(field.key.clone(), field.value.clone());
        }
        map
    }
}

/// 将源文件路径缩短为最后一级目录加文件名
pub fn short_caller(file: &str, line: u32) -> String {
    let normalized = file.replace('\\', "/");
    let mut parts = normalized.rsplit('/');
    let file_name = parts.next().unwrap_or_default();
    match parts.next() {
        Some(dir) if !dir.is_empty() => format!("{}/{}:{}", dir, file_name, line),
        _ => format!("{}:{}", file_name, line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_creation() {
        let record = Record::new(Level::WARN, "disk low".to_string());
        assert_eq!(record.level, Level::WARN);
        assert_eq!(record.message, "disk low");
        assert!(record.logger.is_none());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_fields_object_last_wins() {
        let mut record = Record::new(Level::INFO, "m".to_string());
        record.fields = vec![Field::int("a", 1), Field::int("a", 2), Field::bool("b", true)];
        let object = record.fields_object();
        assert_eq!(object.get("a"), Some(&json!(2)));
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn test_short_caller() {
        assert_eq!(short_caller("src/core/engine.rs", 10), "core/engine.rs:10");
        assert_eq!(short_caller("main.rs", 3), "main.rs:3");
        assert_eq!(short_caller("C:\\app\\src\\lib.rs", 7), "src/lib.rs:7");
    }
}
