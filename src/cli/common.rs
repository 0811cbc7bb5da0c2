//! # 共享参数定义
//!
//! 各子命令共用的模型来源参数与执行参数，通过 `#[command(flatten)]` 嵌入。
//!
//! ## 依赖关系
//! - 被 `cli/library.rs`, `cli/resources.rs`, `cli/check.rs` 使用

use clap::Args;
use std::path::{Path, PathBuf};

/// 模型来源参数
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root of the source tree to search for models
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Model file extension
    #[arg(long, default_value = "osm")]
    pub extension: String,

    /// Keep only models whose path matches this regex (repeatable)
    #[arg(short, long = "pattern")]
    pub patterns: Vec<String>,
}

/// 批量执行参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of parallel workers [default: logical cores - 1]
    #[arg(short, long, env = "N")]
    pub jobs: Option<usize>,

    /// Only list the models that would be upgraded
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// 构建配置文件参数
#[derive(Args, Debug, Clone)]
pub struct SdkConfigArgs {
    /// Build configuration file declaring the SDK version (relative to --root)
    #[arg(long, default_value = "FindOpenStudioSDK.cmake")]
    pub sdk_cmake: PathBuf,
}

impl SdkConfigArgs {
    /// 相对路径按根目录解析
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.sdk_cmake.is_absolute() {
            self.sdk_cmake.clone()
        } else {
            root.join(&self.sdk_cmake)
        }
    }
}
