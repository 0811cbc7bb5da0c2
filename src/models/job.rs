//! # 批量任务配置模型
//!
//! ## 依赖关系
//! - 被 `cli/`, `batch/runner.rs`, `commands/` 使用

use clap::ValueEnum;
use semver::Version;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// worker 的执行方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Worker threads calling the SDK in-process
    Threads,
    /// One child process per model file
    Processes,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Threads => write!(f, "threads"),
            ExecutionMode::Processes => write!(f, "processes"),
        }
    }
}

/// worker 池配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    /// worker 数量；0 表示在调用线程内顺序执行
    pub workers: usize,
    pub mode: ExecutionMode,
    /// 是否显示进度条
    pub progress: bool,
}

/// 计算 worker 数量
///
/// 未指定时为 `max(1, cores - 1)`；指定时原样使用。
pub fn resolve_worker_count(requested: Option<usize>, cores: usize) -> usize {
    match requested {
        Some(n) => n,
        None => cores.saturating_sub(1).max(1),
    }
}

/// 版本与目标不一致的模型文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMismatch {
    pub path: PathBuf,
    /// 无法读取版本头时为 `None`
    pub found: Option<Version>,
}

/// `check --csv` 导出的一行
#[derive(Debug, Clone, Serialize)]
pub struct MismatchRecord {
    pub path: String,
    pub found: String,
    pub target: String,
}

impl MismatchRecord {
    pub fn new(mismatch: &VersionMismatch, target: &Version) -> Self {
        MismatchRecord {
            path: mismatch.path.display().to_string(),
            found: mismatch
                .found
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            target: target.to_string(),
        }
    }
}
