//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `sdk/`, `gate.rs`, `utils/`
//! - 子模块: library, resources, check, worker

pub mod check;
pub mod library;
pub mod resources;
pub mod worker;

use crate::batch::{BatchRunner, BatchSummary, CancelToken, Upgrader};
use crate::cli::common::RunArgs;
use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::models::{resolve_worker_count, ExecutionMode, WorkerPoolConfig};
use crate::sdk::Sdk;
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        openstudio,
        command,
        ..
    } = cli;

    match command {
        Commands::Library(args) => library::execute(args, &openstudio),
        Commands::Resources(args) => resources::execute(args, &openstudio),
        Commands::Check(args) => check::execute(args, &openstudio),
        Commands::Worker(args) => worker::execute(args, &openstudio),
    }
}

/// 根据命令行参数构建 worker 池配置
pub(crate) fn pool_config(run: &RunArgs, mode: ExecutionMode) -> WorkerPoolConfig {
    let workers = resolve_worker_count(run.jobs, num_cpus::get());
    if run.jobs.is_none() {
        output::print_info(&format!("Defaulted number of workers to {}", workers));
    }

    WorkerPoolConfig {
        workers,
        mode,
        progress: !run.no_progress,
    }
}

/// 打印将被升级的文件（--dry-run）
pub(crate) fn print_dry_run(files: &[PathBuf]) {
    for file in files {
        output::print_info(&format!("[DRY] Would upgrade '{}'", file.display()));
    }
    output::print_done(&format!("{} files would be updated", files.len()));
}

/// 并行升级文件列表并打印汇总
pub(crate) fn upgrade_all<S: Sdk>(
    files: &[PathBuf],
    pool: WorkerPoolConfig,
    sdk: &S,
    openstudio: &Path,
    cancel: &CancelToken,
) -> Result<BatchSummary> {
    let upgrader = Upgrader::for_mode(pool.mode, sdk, openstudio, cancel)?;
    let runner = BatchRunner::new(pool, cancel.clone());

    output::print_info(&format!(
        "Updating {} files with {} worker {}",
        files.len(),
        pool.workers,
        pool.mode
    ));

    let summary = runner.run(files, "Updating Libraries", |path| upgrader.upgrade(path))?;

    output::print_separator();
    output::print_done(&summary.message());
    Ok(summary)
}
