//! # 工具函数模块
//!
//! 提供美化输出、进度条、日志和可取消子进程等工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `sdk/` 模块使用
//! - 子模块: logging, output, process, progress

pub mod logging;
pub mod output;
pub mod process;
pub mod progress;
