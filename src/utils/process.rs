//! # 可取消的外部命令执行
//!
//! 启动子进程并轮询其状态；中止标志置位时按 [`Shutdown`] 结束子进程。
//!
//! - `Shutdown::Kill`：直接杀掉（SDK 子进程，暂存文件由本进程清理）
//! - `Shutdown::CloseStdin`：关闭子进程的 stdin，等它自行清理后退出，超时再杀掉
//!   （`osm-upgrade worker` 子进程，暂存文件由 worker 自己清理）
//!
//! ## 依赖关系
//! - 被 `sdk/openstudio.rs`, `batch/worker.rs` 使用
//! - 使用 `batch/cancel.rs`

use crate::batch::CancelToken;
use crate::error::{OsmUpgradeError, Result};

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 子进程被信号结束后，等待中止标志置位的时间
const SIGNAL_SETTLE: Duration = Duration::from_millis(200);

/// 取消时结束子进程的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Kill,
    /// 关闭 stdin 通知子进程退出，超过给定时间仍未退出则杀掉
    CloseStdin(Duration),
}

/// 子进程的执行结果
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// 执行命令直到结束，或在取消时杀掉它
///
/// 取消时返回 `Err(Cancelled)`；命令不存在时返回 `CommandNotFound`。
pub fn run_cancellable(cmd: &mut Command, cancel: &CancelToken) -> Result<CommandOutput> {
    run_with_shutdown(cmd, cancel, Shutdown::Kill)
}

/// 执行命令直到结束；取消时按 `shutdown` 结束子进程
pub fn run_with_shutdown(
    cmd: &mut Command,
    cancel: &CancelToken,
    shutdown: Shutdown,
) -> Result<CommandOutput> {
    let program = cmd.get_program().to_string_lossy().to_string();

    cancel.check()?;

    let stdin = match shutdown {
        Shutdown::Kill => Stdio::null(),
        Shutdown::CloseStdin(_) => Stdio::piped(),
    };

    let mut child = cmd
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => OsmUpgradeError::CommandNotFound {
                command: program.clone(),
            },
            _ => OsmUpgradeError::CommandFailed {
                command: program.clone(),
                stderr: e.to_string(),
            },
        })?;

    tracing::debug!(pid = child.id(), command = %program, "spawned");

    // 管道由独立线程读取，避免子进程输出填满缓冲区后阻塞
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let mut stdin = child.stdin.take();

    let status = loop {
        if cancel.is_cancelled() {
            match shutdown {
                Shutdown::Kill => {
                    tracing::debug!(pid = child.id(), "killing child after cancellation");
                    child.kill().ok();
                }
                Shutdown::CloseStdin(grace) => {
                    tracing::debug!(pid = child.id(), "asking child to stop");
                    drop(stdin.take());
                    if !wait_for_exit(&mut child, grace) {
                        tracing::warn!(pid = child.id(), "child ignored shutdown request, killing it");
                        child.kill().ok();
                    }
                }
            }
            child.wait().ok();
            return Err(OsmUpgradeError::Cancelled);
        }

        match child.try_wait() {
            Ok(Some(status)) if interrupted(&status, cancel) => {
                return Err(OsmUpgradeError::Cancelled);
            }
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                child.kill().ok();
                return Err(OsmUpgradeError::CommandFailed {
                    command: program,
                    stderr: e.to_string(),
                });
            }
        }
    };

    Ok(CommandOutput {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

/// 在 `grace` 内等待子进程退出
fn wait_for_exit(child: &mut Child, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            _ => return false,
        }
    }
}

/// 子进程被信号结束且本进程也在中止
///
/// 终端的 Ctrl-C 同时送到子进程，子进程可能先于信号处理器退出。
fn interrupted(status: &ExitStatus, cancel: &CancelToken) -> bool {
    if status.code().is_some() {
        return false;
    }
    if !cancel.is_cancelled() {
        thread::sleep(SIGNAL_SETTLE);
    }
    cancel.is_cancelled()
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).ok();
        String::from_utf8_lossy(&buf).to_string()
    })
}

fn collect(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
