//! `tracing` 处理层
//!
//! 目前只有重定向层，把进程内的 `tracing` 事件接入 logz 引擎。

pub mod redirect;

pub use redirect::{redirect_std_log, redirect_std_log_to, RedirectLayer, RedirectTarget};
