//! # worker 命令实现
//!
//! 进程模式下的单文件升级：Load → Translate → Save。
//! 失败时以 `error.rs` 中约定的退出码结束，父进程据此还原错误。
//!
//! 父进程中止时关闭本进程的 stdin；终端信号同样有效。两者都只置位中止标志，
//! SDK 子进程由 `utils/process.rs` 结束，暂存文件在返回前删除。
//!
//! ## 依赖关系
//! - 使用 `cli/worker.rs` 定义的参数
//! - 使用 `sdk/`, `batch/cancel.rs`

use crate::batch::{cancel_on_stdin_close, install_signal_handler, CancelToken};
use crate::cli::worker::WorkerArgs;
use crate::error::Result;
use crate::sdk::{upgrade_model, OpenStudioCli};

use std::path::Path;

/// 执行 worker 命令
pub fn execute(args: WorkerArgs, openstudio: &Path) -> Result<()> {
    tracing::debug!(model = %args.model.display(), pid = std::process::id(), "worker started");

    let cancel = CancelToken::new();
    install_signal_handler(&cancel)?;
    cancel_on_stdin_close(&cancel);

    let sdk = OpenStudioCli::new(openstudio, cancel);
    upgrade_model(&sdk, &args.model)
}
