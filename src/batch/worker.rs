//! # 逐文件升级的执行方式
//!
//! - `Threads`：worker 线程直接调用 SDK
//! - `Processes`：每个文件由一个 `osm-upgrade worker <path>` 子进程处理，
//!   子进程的退出码还原为对应的错误；中止时关闭子进程的 stdin，
//!   子进程结束自己的 SDK 进程、删除暂存文件后以 130 退出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `sdk/`, `utils/process.rs`

use crate::batch::CancelToken;
use crate::error::{OsmUpgradeError, Result};
use crate::models::ExecutionMode;
use crate::sdk::{upgrade_model, Sdk};
use crate::utils::process::{run_with_shutdown, Shutdown};

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// 中止时等待 worker 自行退出的时间
const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// 在子进程中升级单个模型
#[derive(Debug, Clone)]
pub struct ProcessWorker {
    /// 本程序的可执行文件
    program: PathBuf,
    /// 传给子进程的 SDK 可执行文件
    openstudio: PathBuf,
    cancel: CancelToken,
}

impl ProcessWorker {
    pub fn new(program: PathBuf, openstudio: PathBuf, cancel: CancelToken) -> Self {
        Self {
            program,
            openstudio,
            cancel,
        }
    }

    /// 以当前可执行文件作为 worker
    pub fn current(openstudio: PathBuf, cancel: CancelToken) -> Result<Self> {
        let program = std::env::current_exe().map_err(|e| {
            OsmUpgradeError::Other(format!("Cannot locate the osm-upgrade executable: {}", e))
        })?;
        Ok(Self::new(program, openstudio, cancel))
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--openstudio")
            .arg(&self.openstudio)
            .arg("worker")
            .arg(path);
        cmd
    }

    pub fn upgrade(&self, path: &Path) -> Result<()> {
        let output = run_with_shutdown(
            &mut self.command(path),
            &self.cancel,
            Shutdown::CloseStdin(WORKER_SHUTDOWN_GRACE),
        )?;

        if !output.stderr.trim().is_empty() {
            tracing::debug!(model = %path.display(), stderr = %output.stderr.trim(), "worker stderr");
        }

        match output.status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(OsmUpgradeError::from_worker_exit(
                &path.display().to_string(),
                code,
            )),
            // 被信号杀死
            None => Err(OsmUpgradeError::WorkerFailed {
                path: path.display().to_string(),
                code: -1,
            }),
        }
    }
}

/// 按执行方式分派的升级操作
pub enum Upgrader<'a, S: Sdk> {
    InProcess(&'a S),
    Subprocess(ProcessWorker),
}

impl<'a, S: Sdk> Upgrader<'a, S> {
    /// 按执行方式构造
    pub fn for_mode(
        mode: ExecutionMode,
        sdk: &'a S,
        openstudio: &Path,
        cancel: &CancelToken,
    ) -> Result<Self> {
        Ok(match mode {
            ExecutionMode::Threads => Upgrader::InProcess(sdk),
            ExecutionMode::Processes => Upgrader::Subprocess(ProcessWorker::current(
                openstudio.to_path_buf(),
                cancel.clone(),
            )?),
        })
    }

    pub fn upgrade(&self, path: &Path) -> Result<()> {
        match self {
            Upgrader::InProcess(sdk) => upgrade_model(*sdk, path),
            Upgrader::Subprocess(worker) => worker.upgrade(path),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::{EXIT_CANCELLED, EXIT_TRANSLATION_FAILED};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// 假的 worker 程序：按模型文件名决定退出码
    ///
    /// `*slow*` 模拟正在转换的 worker：先写暂存文件，stdin 关闭后删除它并以 130 退出。
    fn fake_program(dir: &Path) -> PathBuf {
        let script = dir.join("fake-worker");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\nfor a in \"$@\"; do last=\"$a\"; done\ncase \"$last\" in\n  *broken*) exit {tf};;\n  *killed*) exit {c};;\n  *weird*) exit 9;;\n  *slow*)\n    tmp=\"$(dirname \"$last\")/.osm-upgrade-pending.osm\"\n    echo partial > \"$tmp\"\n    cat > /dev/null\n    rm -f \"$tmp\"\n    exit {c};;\nesac\nexit 0\n",
                tf = EXIT_TRANSLATION_FAILED,
                c = EXIT_CANCELLED
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn test_worker_exit_codes() {
        let dir = TempDir::new().unwrap();
        let worker = ProcessWorker::new(
            fake_program(dir.path()),
            PathBuf::from("openstudio"),
            CancelToken::new(),
        );

        assert!(worker.upgrade(Path::new("ok.osm")).is_ok());
        assert!(matches!(
            worker.upgrade(Path::new("broken.osm")).unwrap_err(),
            OsmUpgradeError::TranslationFailed { .. }
        ));
        assert!(worker.upgrade(Path::new("killed.osm")).unwrap_err().is_cancelled());
        assert!(matches!(
            worker.upgrade(Path::new("weird.osm")).unwrap_err(),
            OsmUpgradeError::WorkerFailed { code: 9, .. }
        ));
    }

    #[test]
    fn test_worker_not_started_after_cancel() {
        let dir = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let worker = ProcessWorker::new(fake_program(dir.path()), PathBuf::from("openstudio"), cancel);

        assert!(worker.upgrade(Path::new("ok.osm")).unwrap_err().is_cancelled());
    }

    #[test]
    fn test_abort_lets_worker_remove_its_staging_file() {
        let dir = TempDir::new().unwrap();
        let library = dir.path().join("library");
        fs::create_dir(&library).unwrap();
        let model = library.join("slow.osm");
        fs::write(&model, "original").unwrap();

        let cancel = CancelToken::new();
        let worker = ProcessWorker::new(
            fake_program(dir.path()),
            PathBuf::from("openstudio"),
            cancel.clone(),
        );

        let trigger = cancel.clone();
        let staging = library.join(".osm-upgrade-pending.osm");
        let watched = staging.clone();
        let canceller = std::thread::spawn(move || {
            // 等 worker 写出暂存文件后再中止
            for _ in 0..100 {
                if watched.exists() {
                    break;
                }
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            trigger.cancel();
        });

        let err = worker.upgrade(&model).unwrap_err();
        canceller.join().unwrap();

        assert!(err.is_cancelled());
        assert!(!staging.exists());
        let left: Vec<_> = fs::read_dir(&library)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![std::ffi::OsString::from("slow.osm")]);
        assert_eq!(fs::read_to_string(&model).unwrap(), "original");
    }
}
