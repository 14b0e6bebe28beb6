//! 结构化字段与键值对归一化
//!
//! 所有 `*w` 形式的调用都接收一个扁平的键值列表
//! `[key, value, key, value, ...]`，由 [`normalize`] 转换为 [`Field`] 序列。
//! 归一化是"尽力而为"的：输入格式错误时保留已解析的字段，
//! 丢弃剩余部分，并报告一次误用诊断，而不会让调用方的日志操作失败。

use crate::core::engine::{Engine, Entry};
use crate::core::level::Level;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// 带类型的键值对
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new<K: Into<String>>(key: K, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// 任意可序列化的值；序列化失败时记录错误文本
    pub fn any<K: Into<String>, T: Serialize + ?Sized>(key: K, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)));
        Self::new(key, value)
    }

    pub fn string<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int<K: Into<String>>(key: K, value: i64) -> Self {
        Self::new(key, Value::from(value))
    }

    pub fn uint<K: Into<String>>(key: K, value: u64) -> Self {
        Self::new(key, Value::from(value))
    }

    pub fn float<K: Into<String>>(key: K, value: f64) -> Self {
        Self::new(key, Value::from(value))
    }

    pub fn bool<K: Into<String>>(key: K, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// 时长以毫秒（浮点）编码
    pub fn duration<K: Into<String>>(key: K, value: Duration) -> Self {
        Self::new(key, Value::from(value.as_nanos() as f64 / 1_000_000.0))
    }

    /// 以 `error` 为键记录错误的显示文本
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::string("error", err.to_string())
    }

    /// 作为值使用时的 JSON 表示：`{key: value}`
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert(self.key.clone(), self.value.clone());
        Value::Object(map)
    }
}

/// 键值调用中的单个参数
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// 原始值，位于键的位置时必须是字符串
    Value(Value),
    /// 预先构建好的字段，不应出现在键值列表中
    Field(Field),
}

impl Arg {
    /// 任意可序列化的值
    pub fn any<T: Serialize + ?Sized>(value: &T) -> Self {
        Arg::Value(
            serde_json::to_value(value)
                .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e))),
        )
    }

    fn into_value(self) -> Value {
        match self {
            Arg::Value(value) => value,
            Arg::Field(field) => field.to_value(),
        }
    }
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Value(Value::String(value.clone()))
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Arg::Value(Value::Null))
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_arg_from!(&str, String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// 归一化过程中检测到的调用方误用
#[derive(Debug, Clone, PartialEq)]
pub enum Misuse {
    /// 键的位置出现了预构建字段
    FieldAsKey(Field),
    /// 末尾的键没有对应的值
    UnpairedKey(Value),
    /// 键不是字符串
    NonStringKey(Value),
}

impl Misuse {
    pub fn message(&self) -> &'static str {
        match self {
            Misuse::FieldAsKey(_) => "strongly-typed field passed as a key-value argument",
            Misuse::UnpairedKey(_) => "odd number of arguments passed as key-value pairs for logging",
            Misuse::NonStringKey(_) => "non-string key argument passed for logging",
        }
    }

    /// 诊断记录上携带的字段
    pub fn field(&self) -> Field {
        match self {
            Misuse::FieldAsKey(field) => Field::new("field", field.to_value()),
            Misuse::UnpairedKey(key) => Field::new("ignored key", key.clone()),
            Misuse::NonStringKey(key) => Field::new("invalid key", key.clone()),
        }
    }
}

/// 归一化结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub fields: Vec<Field>,
    pub misuse: Option<Misuse>,
}

/// 将扁平的键值列表转换为字段序列（纯函数）。
///
/// 结果为 `additional` 后接按输入顺序解析出的字段。遇到第一处误用即停止，
/// 之前累积的字段保留。
pub fn normalize(args: &[Arg], additional: &[Field]) -> Normalized {
    if args.is_empty() {
        return Normalized {
            fields: additional.to_vec(),
            misuse: None,
        };
    }

    let mut fields = Vec::with_capacity(args.len() / 2 + additional.len());
    fields.extend_from_slice(additional);
    let mut misuse = None;

    let mut i = 0;
    while i < args.len() {
        if let Arg::Field(field) = &args[i] {
            misuse = Some(Misuse::FieldAsKey(field.clone()));
            break;
        }
        if i == args.len() - 1 {
            misuse = Some(Misuse::UnpairedKey(args[i].clone().into_value()));
            break;
        }

        let key = match &args[i] {
            Arg::Value(Value::String(key)) => key.clone(),
            other => {
                misuse = Some(Misuse::NonStringKey(other.clone().into_value()));
                break;
            }
        };
        fields.push(Field::new(key, args[i + 1].clone().into_value()));
        i += 2;
    }

    Normalized { fields, misuse }
}

/// 归一化并在检测到误用时向引擎报告一条 DPANIC 级别的诊断记录。
#[track_caller]
pub fn handle_fields(engine: &dyn Engine, args: &[Arg], additional: &[Field]) -> Vec<Field> {
    let Normalized { fields, misuse } = normalize(args, additional);
    if let Some(misuse) = misuse {
        report_misuse(engine, &misuse);
    }
    fields
}

#[track_caller]
fn report_misuse(engine: &dyn Engine, misuse: &Misuse) {
    crate::diagnostics::record(|d| d.increment_misuse_reports());
    if engine.enabled(Level::DPANIC) {
        engine.emit(
            Entry::new(Level::DPANIC, misuse.message()),
            vec![misuse.field()],
        );
    }
    if engine.development() {
        panic!("{}", misuse.message());
    }
}
