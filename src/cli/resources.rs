//! # resources 子命令 CLI 定义
//!
//! 校验 SDK 版本后，升级所有版本过期的模型
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/resources.rs`

use super::common::{RunArgs, SdkConfigArgs, SourceArgs};
use crate::models::ExecutionMode;
use clap::Args;

/// resources 子命令参数
#[derive(Args, Debug)]
pub struct ResourcesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sdk: SdkConfigArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// How workers run
    #[arg(long, value_enum, default_value = "processes")]
    pub mode: ExecutionMode,
}
