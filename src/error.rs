//! # 统一错误处理模块
//!
//! 定义 osm-upgrade 的所有错误类型，使用 `thiserror` 派生。
//!
//! 所有错误对整批任务都是致命的：任何一个模型失败都会中止整个运行。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// 进程退出码：模型文件不存在
pub const EXIT_MODEL_NOT_FOUND: i32 = 3;
/// 进程退出码：版本转换失败
pub const EXIT_TRANSLATION_FAILED: i32 = 4;
/// 进程退出码：保存失败
pub const EXIT_SAVE_FAILED: i32 = 5;
/// 进程退出码：被信号中断
pub const EXIT_CANCELLED: i32 = 130;

/// osm-upgrade 统一错误类型
#[derive(Error, Debug)]
pub enum OsmUpgradeError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid version string '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 模型升级错误
    // ─────────────────────────────────────────────────────────────
    #[error("The model couldn't be found for {path}")]
    ModelNotFound { path: String },

    #[error("Version translation failed for {path}")]
    TranslationFailed { path: String },

    #[error("Saving the translated model failed for {path}")]
    SaveFailed { path: String },

    #[error("Current openstudio used is at version {runtime} while {source_file} has it at {declared}")]
    VersionMismatch {
        declared: String,
        runtime: String,
        source_file: String,
    },

    #[error("Worker for '{path}' exited with status {code}")]
    WorkerFailed { path: String, code: i32 },

    #[error("Interrupted, all workers were killed")]
    Cancelled,

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl OsmUpgradeError {
    /// 该错误对应的进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            OsmUpgradeError::ModelNotFound { .. } => EXIT_MODEL_NOT_FOUND,
            OsmUpgradeError::TranslationFailed { .. } => EXIT_TRANSLATION_FAILED,
            OsmUpgradeError::SaveFailed { .. } => EXIT_SAVE_FAILED,
            OsmUpgradeError::Cancelled => EXIT_CANCELLED,
            _ => 1,
        }
    }

    /// 将 worker 子进程的退出码还原为错误
    pub fn from_worker_exit(path: &str, code: i32) -> Self {
        let path = path.to_string();
        match code {
            EXIT_MODEL_NOT_FOUND => OsmUpgradeError::ModelNotFound { path },
            EXIT_TRANSLATION_FAILED => OsmUpgradeError::TranslationFailed { path },
            EXIT_SAVE_FAILED => OsmUpgradeError::SaveFailed { path },
            EXIT_CANCELLED => OsmUpgradeError::Cancelled,
            code => OsmUpgradeError::WorkerFailed { path, code },
        }
    }

    /// 是否为取消导致的错误
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OsmUpgradeError::Cancelled)
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, OsmUpgradeError>;
