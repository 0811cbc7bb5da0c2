//! # resources 命令实现
//!
//! 先确认 SDK 版本，再升级所有版本与之不同的模型。
//!
//! ## 功能
//! - 版本闸门：构建配置文件声明的版本必须等于运行时 SDK 版本
//! - 查找模型并读取版本头，只保留版本不一致的文件
//! - 并行升级（默认进程模式），任一失败即中止
//!
//! ## 依赖关系
//! - 使用 `cli/resources.rs` 定义的参数
//! - 使用 `gate.rs`, `batch/`, `sdk/`, `utils/`

use super::{pool_config, print_dry_run, upgrade_all};
use crate::batch::{
    find_version_mismatches, install_signal_handler, BatchSummary, CancelToken, ModelCollector,
};
use crate::cli::resources::ResourcesArgs;
use crate::error::Result;
use crate::gate;
use crate::sdk::{OpenStudioCli, Sdk};
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};

/// 执行 resources 命令
pub fn execute(args: ResourcesArgs, openstudio: &Path) -> Result<()> {
    output::print_header("Updating Resource Models");

    let cancel = CancelToken::new();
    install_signal_handler(&cancel)?;

    let sdk = OpenStudioCli::new(openstudio, cancel.clone());
    output::print_info(&format!("Using SDK '{}'", sdk.executable().display()));

    run_resources(&args, &sdk, openstudio, &cancel).map(|_| ())
}

/// resources 流程主体；dry-run 或没有过期文件时返回 `None`
pub fn run_resources<S: Sdk>(
    args: &ResourcesArgs,
    sdk: &S,
    openstudio: &Path,
    cancel: &CancelToken,
) -> Result<Option<BatchSummary>> {
    // 版本不一致时在这里返回，任何模型都还没被读取
    let report = gate::check(&args.sdk.resolve(&args.source.root), sdk)?;
    let target = report.declared;

    let candidates = ModelCollector::new(&args.source.root)
        .with_extension(&args.source.extension)?
        .with_patterns(&args.source.patterns)?
        .collect()?;

    let spinner = progress::create_spinner(&format!(
        "Checking versions of {} models...",
        candidates.len()
    ));
    let mismatches = find_version_mismatches(sdk, &candidates, &target);
    spinner.finish_and_clear();

    let files: Vec<PathBuf> = mismatches?.into_iter().map(|m| m.path).collect();

    output::print_info(&format!(
        "{} of {} models are not at version {}",
        files.len(),
        candidates.len(),
        target
    ));

    if files.is_empty() {
        output::print_success("All models are up to date.");
        return Ok(None);
    }

    if args.run.dry_run {
        print_dry_run(&files);
        return Ok(None);
    }

    let pool = pool_config(&args.run, args.mode);
    upgrade_all(&files, pool, sdk, openstudio, cancel).map(Some)
}
