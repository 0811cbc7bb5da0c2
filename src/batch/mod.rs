//! # 批量处理模块
//!
//! 提供模型文件的批量升级能力。
//!
//! ## 功能
//! - 收集匹配文件列表（按路径或版本筛选）
//! - 并行处理，快速失败
//! - 信号取消
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被各命令模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度
//! - 使用 `ctrlc` 处理终止信号

pub mod cancel;
pub mod collector;
pub mod runner;
pub mod worker;

pub use cancel::{cancel_on_stdin_close, install_signal_handler, CancelToken};
pub use collector::{find_version_mismatches, ModelCollector, DEFAULT_LIBRARY_PATTERNS};
pub use runner::{BatchRunner, BatchSummary};
pub use worker::Upgrader;
