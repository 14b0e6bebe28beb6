//! 便捷宏

/// 构建键值调用使用的参数列表
///
/// ```rust
/// use logz::{args, Arg};
///
/// let kv: Vec<Arg> = args!["user", "alice", "attempts", 3];
/// assert_eq!(kv.len(), 4);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($value)),+]
    };
}

/// 通过默认日志器输出 DEBUG 级别的格式化消息
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::global::debugf(::std::format_args!($($arg)+))
    };
}

/// 通过默认日志器输出 INFO 级别的格式化消息
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::global::infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::global::warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::global::errorf(::std::format_args!($($arg)+))
    };
}
