//! # worker 子命令 CLI 定义
//!
//! 内部使用：进程模式下由父进程为每个模型启动
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/worker.rs`

use clap::Args;
use std::path::PathBuf;

/// worker 子命令参数
#[derive(Args, Debug)]
pub struct WorkerArgs {
    /// Model file to upgrade in place
    pub model: PathBuf,
}
