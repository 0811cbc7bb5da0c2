//! # library 命令实现
//!
//! 按路径正则筛选库模型并升级到当前 SDK 版本。
//!
//! ## 功能
//! - 在根目录下查找 `*.osm`
//! - 只保留匹配路径正则的文件（未指定时使用内置的库目录）
//! - 并行执行 Load → Translate → Save，任一失败即中止
//!
//! ## 依赖关系
//! - 使用 `cli/library.rs` 定义的参数
//! - 使用 `batch/`, `sdk/`, `utils/output.rs`

use super::{pool_config, print_dry_run, upgrade_all};
use crate::batch::{
    install_signal_handler, BatchSummary, CancelToken, ModelCollector, DEFAULT_LIBRARY_PATTERNS,
};
use crate::cli::library::LibraryArgs;
use crate::error::Result;
use crate::sdk::{OpenStudioCli, Sdk};
use crate::utils::output;

use std::path::Path;

/// 执行 library 命令
pub fn execute(args: LibraryArgs, openstudio: &Path) -> Result<()> {
    output::print_header("Updating Library Models");

    let cancel = CancelToken::new();
    install_signal_handler(&cancel)?;

    let sdk = OpenStudioCli::new(openstudio, cancel.clone());
    output::print_info(&format!("Using SDK '{}'", sdk.executable().display()));

    run_library(&args, &sdk, openstudio, &cancel).map(|_| ())
}

/// library 流程主体；dry-run 或没有匹配文件时返回 `None`
pub fn run_library<S: Sdk>(
    args: &LibraryArgs,
    sdk: &S,
    openstudio: &Path,
    cancel: &CancelToken,
) -> Result<Option<BatchSummary>> {
    let patterns: Vec<String> = if args.source.patterns.is_empty() {
        DEFAULT_LIBRARY_PATTERNS.iter().map(|s| s.to_string()).collect()
    } else {
        args.source.patterns.clone()
    };

    let files = ModelCollector::new(&args.source.root)
        .with_extension(&args.source.extension)?
        .with_patterns(&patterns)?
        .collect()?;

    output::print_info(&format!(
        "Found {} models under '{}' matching {}",
        files.len(),
        args.source.root.display(),
        patterns.join(" | ")
    ));

    if files.is_empty() {
        output::print_warning("No library models matched, nothing to do.");
        return Ok(None);
    }

    if args.run.dry_run {
        print_dry_run(&files);
        return Ok(None);
    }

    let pool = pool_config(&args.run, args.mode);
    upgrade_all(&files, pool, sdk, openstudio, cancel).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::{RunArgs, SourceArgs};
    use crate::error::OsmUpgradeError;
    use crate::models::ExecutionMode;
    use crate::parsers::osm::read_model_version;
    use crate::sdk::fake::FakeSdk;
    use semver::Version;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(root: &Path, patterns: &[&str], dry_run: bool) -> LibraryArgs {
        LibraryArgs {
            source: SourceArgs {
                root: root.to_path_buf(),
                extension: "osm".to_string(),
                patterns: patterns.iter().map(|s| s.to_string()).collect(),
            },
            run: RunArgs {
                jobs: Some(2),
                dry_run,
                no_progress: true,
            },
            mode: ExecutionMode::Threads,
        }
    }

    fn write_model(root: &Path, rel: &str, version: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, FakeSdk::osm(version)).unwrap();
        path
    }

    #[test]
    fn test_library_end_to_end() {
        let dir = TempDir::new().unwrap();
        let models: Vec<PathBuf> = ["a.osm", "b.osm", "c.osm"]
            .iter()
            .map(|n| write_model(dir.path(), &format!("src/openstudio_app/Resources/{}", n), "3.2.0"))
            .collect();
        let untouched = write_model(dir.path(), "src/other/d.osm", "3.2.0");

        let sdk = FakeSdk::new("3.7.0");
        let summary = run_library(
            &args(dir.path(), &[], false),
            &sdk,
            Path::new("openstudio"),
            &CancelToken::new(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(summary.processed, 3);
        assert!(summary.message().contains("3 files"));
        for m in &models {
            assert_eq!(read_model_version(m).unwrap(), Some(Version::new(3, 7, 0)));
        }
        assert_eq!(read_model_version(&untouched).unwrap(), Some(Version::new(3, 2, 0)));
    }

    #[test]
    fn test_library_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "lib/a.osm", "3.2.0");
        let broken = write_model(dir.path(), "lib/b.osm", "3.2.0");
        write_model(dir.path(), "lib/c.osm", "3.2.0");

        let sdk = FakeSdk::new("3.7.0").failing_load(&broken);
        let err = run_library(
            &args(dir.path(), &["lib/"], false),
            &sdk,
            Path::new("openstudio"),
            &CancelToken::new(),
        )
        .unwrap_err();

        assert!(matches!(err, OsmUpgradeError::TranslationFailed { .. }));
    }

    #[test]
    fn test_library_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "lib/a.osm", "3.2.0");

        let sdk = FakeSdk::new("3.7.0");
        let outcome = run_library(
            &args(dir.path(), &["lib/"], true),
            &sdk,
            Path::new("openstudio"),
            &CancelToken::new(),
        )
        .unwrap();

        assert!(outcome.is_none());
        assert!(sdk.calls().is_empty());
    }
}
