//! # library 子命令 CLI 定义
//!
//! 升级按路径筛选出的库模型
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/library.rs`

use super::common::{RunArgs, SourceArgs};
use crate::models::ExecutionMode;
use clap::Args;

/// library 子命令参数
#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// How workers run
    #[arg(long, value_enum, default_value = "threads")]
    pub mode: ExecutionMode,
}
