//! # check 命令实现
//!
//! 只读地列出版本与目标不一致的模型，可导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `parsers/cmake.rs`
//! - 使用 `tabled` 输出表格，`csv` 导出

use crate::batch::{find_version_mismatches, CancelToken, ModelCollector};
use crate::cli::check::CheckArgs;
use crate::error::{OsmUpgradeError, Result};
use crate::models::{parse_version, MismatchRecord};
use crate::parsers::cmake;
use crate::sdk::{OpenStudioCli, Sdk};
use crate::utils::output;

use semver::Version;
use std::path::Path;
use tabled::{Table, Tabled};

/// 报告表格行
#[derive(Debug, Clone, Tabled)]
struct ReportRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Found")]
    found: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl From<&MismatchRecord> for ReportRow {
    fn from(r: &MismatchRecord) -> Self {
        ReportRow {
            model: r.path.clone(),
            found: r.found.clone(),
            target: r.target.clone(),
        }
    }
}

/// 执行 check 命令
pub fn execute(args: CheckArgs, openstudio: &Path) -> Result<()> {
    output::print_header("Checking Model Versions");

    // 只读版本头，不会启动 openstudio 子进程
    let sdk = OpenStudioCli::new(openstudio, CancelToken::new());
    let records = run_check(&args, &sdk)?;

    if records.is_empty() {
        output::print_success("All models are up to date.");
    } else {
        let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
        println!("{}", Table::new(&rows));
        output::print_warning(&format!("{} models need upgrading", records.len()));
    }

    if let Some(ref csv_path) = args.csv {
        save_records_csv(&records, csv_path)?;
        output::print_success(&format!("Report saved to '{}'", csv_path.display()));
    }

    Ok(())
}

/// 解析目标版本：`--target` 优先，否则读构建配置文件
fn resolve_target(args: &CheckArgs) -> Result<Version> {
    match args.target {
        Some(ref t) => parse_version(t),
        None => cmake::parse_cmake_file(&args.sdk.resolve(&args.source.root)),
    }
}

/// check 流程主体
pub fn run_check<S: Sdk>(args: &CheckArgs, sdk: &S) -> Result<Vec<MismatchRecord>> {
    let target = resolve_target(args)?;
    output::print_info(&format!("Target version: {}", target));

    let files = ModelCollector::new(&args.source.root)
        .with_extension(&args.source.extension)?
        .with_patterns(&args.source.patterns)?
        .collect()?;

    let mismatches = find_version_mismatches(sdk, &files, &target)?;
    output::print_info(&format!(
        "{} of {} models differ from {}",
        mismatches.len(),
        files.len(),
        target
    ));

    Ok(mismatches
        .iter()
        .map(|m| MismatchRecord::new(m, &target))
        .collect())
}

/// 保存报告到 CSV
fn save_records_csv(records: &[MismatchRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush().map_err(|e| OsmUpgradeError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
