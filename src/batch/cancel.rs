//! # 取消处理
//!
//! 共享的中止标志，以及把终止信号接到该标志上的处理器。
//!
//! ## 功能
//! - 收到 SIGINT / SIGTERM / SIGHUP：置位中止标志，不再派发新任务，
//!   正在运行的子进程由 `utils/process.rs` 负责结束
//! - 重复的信号只记录日志；进程总是沿正常路径退出，暂存文件得以清理
//! - worker 子进程的 stdin 被父进程关闭时同样置位中止标志
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `utils/process.rs`, `sdk/openstudio.rs` 使用
//! - 使用 `ctrlc` crate

use crate::error::{OsmUpgradeError, Result};
use crate::utils::output;

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 跨线程共享的中止标志
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 置位中止标志，返回此前是否已经置位
    pub fn cancel(&self) -> bool {
        self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// 已取消时返回 `Err(Cancelled)`
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(OsmUpgradeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// 安装信号处理器
///
/// 每个进程只能安装一次。
pub fn install_signal_handler(token: &CancelToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        if token.cancel() {
            tracing::warn!("termination signal repeated, already stopping");
            return;
        }
        output::print_warning("KILLING: termination requested, stopping all workers");
        tracing::warn!("termination signal received, abort flag raised");
    })
    .map_err(|e| OsmUpgradeError::Other(format!("Failed to install signal handler: {}", e)))
}

/// 父进程关闭 stdin 时置位中止标志
///
/// 用于 `worker` 子进程：父进程中止时只需关闭管道，子进程自己结束 SDK 进程并清理暂存文件。
pub fn cancel_on_stdin_close(token: &CancelToken) {
    let token = token.clone();
    std::thread::spawn(move || watch_until_closed(io::stdin(), &token));
}

fn watch_until_closed<R: Read>(mut input: R, token: &CancelToken) {
    let mut buf = [0u8; 64];
    loop {
        match input.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => continue,
        }
    }
    if !token.cancel() {
        tracing::debug!("parent closed the control pipe, stopping");
    }
}
