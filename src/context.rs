//! 请求作用域的上下文
//!
//! [`Context`] 是不可变的类型化键值表，通过显式传参在调用链中传递。
//! 写入总是返回新的上下文，原上下文保持不变。

use crate::logger::Logger;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 上下文中保存日志器的保留键
pub const LOGGER_KEY: &str = "logz.logger";

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<&'static str, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回在 `key` 下保存了 `value` 的新上下文
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        self.with_shared(key, Arc::new(value))
    }

    /// 与 [`Context::with_value`] 相同，但直接保存共享指针
    pub fn with_shared<T: Any + Send + Sync>(&self, key: &'static str, value: Arc<T>) -> Self {
        let mut values = HashMap::clone(&self.values);
        values.insert(key, value as Value);
        Self {
            values: Arc::new(values),
        }
    }

    /// 读取 `key` 下类型为 `T` 的值；键不存在或类型不符时返回 None
    pub fn value<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.values.get(key).cloned()?.downcast::<T>().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&&str> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

/// 取出通过 [`Logger::with_context`] 绑定的日志器
pub fn from_context(ctx: &Context) -> Option<Arc<Logger>> {
    ctx.value::<Logger>(LOGGER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_does_not_mutate_parent() {
        let root = Context::new();
        let child = root.with_value("request_id", String::from("r-42"));

        assert!(root.is_empty());
        assert!(!root.contains("request_id"));
        assert_eq!(child.len(), 1);
        assert_eq!(
            child.value::<String>("request_id").as_deref(),
            Some(&String::from("r-42"))
        );
    }

    #[test]
    fn test_value_type_mismatch() {
        let ctx = Context::new().with_value("n", 7_u32);
        assert!(ctx.value::<String>("n").is_none());
        assert_eq!(*ctx.value::<u32>("n").unwrap(), 7);
        assert!(ctx.value::<u32>("missing").is_none());
    }

    #[test]
    fn test_overwrite_key() {
        let first = Context::new().with_value("k", 1_i32);
        let second = first.with_value("k", 2_i32);
        assert_eq!(*first.value::<i32>("k").unwrap(), 1);
        assert_eq!(*second.value::<i32>("k").unwrap(), 2);
    }

    #[test]
    fn test_from_context_without_logger() {
        let ctx = Context::new().with_value(LOGGER_KEY, "not a logger");
        assert!(from_context(&ctx).is_none());
        assert!(from_context(&Context::new()).is_none());
    }

    #[test]
    fn test_debug_lists_keys() {
        let ctx = Context::new().with_value("b", 1_u8).with_value("a", 2_u8);
        assert_eq!(format!("{:?}", ctx), r#"Context { keys: ["a", "b"] }"#);
    }
}
