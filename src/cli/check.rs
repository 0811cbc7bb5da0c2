//! # check 子命令 CLI 定义
//!
//! 只读：列出版本与目标不一致的模型
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use super::common::{SdkConfigArgs, SourceArgs};
use clap::Args;
use std::path::PathBuf;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sdk: SdkConfigArgs,

    /// Target version to compare against (skips the build configuration file)
    #[arg(long)]
    pub target: Option<String>,

    /// Also write the mismatches to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
