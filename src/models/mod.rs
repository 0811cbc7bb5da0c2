//! # 数据模型模块
//!
//! 定义版本号与批量任务配置的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `sdk/`, `batch/` 和 `commands/` 使用
//! - 子模块: version, job

pub mod job;
pub mod version;

pub use job::{
    resolve_worker_count, ExecutionMode, MismatchRecord, VersionMismatch, WorkerPoolConfig,
};
pub use version::{parse_version, same_core, SdkVersion};
