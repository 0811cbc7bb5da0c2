//! # 版本闸门
//!
//! 在动任何文件之前，确认构建配置文件声明的 SDK 版本与运行时 SDK 版本一致。
//!
//! ## 规则
//! - 只比较 `major.minor.patch`
//! - 不一致：中止整个运行
//! - 运行时为预发布构建：打印警告，继续
//!
//! ## 依赖关系
//! - 被 `commands/resources.rs`, `commands/check.rs` 使用
//! - 使用 `parsers/cmake.rs`, `sdk/`

use crate::error::{OsmUpgradeError, Result};
use crate::models::{same_core, SdkVersion};
use crate::parsers::cmake;
use crate::sdk::Sdk;
use crate::utils::output;

use semver::Version;
use std::path::Path;

/// 闸门检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    /// 构建配置文件声明的版本
    pub declared: Version,
    pub runtime: SdkVersion,
}

impl GateReport {
    pub fn prerelease(&self) -> bool {
        self.runtime.is_prerelease()
    }
}

/// 比较声明版本与运行时版本
pub fn compare(declared: &Version, runtime: &SdkVersion, source_file: &str) -> Result<GateReport> {
    if !same_core(declared, &runtime.version) {
        return Err(OsmUpgradeError::VersionMismatch {
            declared: declared.to_string(),
            runtime: runtime.core().to_string(),
            source_file: source_file.to_string(),
        });
    }

    Ok(GateReport {
        declared: declared.clone(),
        runtime: runtime.clone(),
    })
}

/// 读取构建配置文件并与 SDK 比较，打印结果
pub fn check<S: Sdk + ?Sized>(cmake_path: &Path, sdk: &S) -> Result<GateReport> {
    let declared = cmake::parse_cmake_file(cmake_path)?;
    let file_name = cmake_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cmake_path.display().to_string());

    output::print_info(&format!(
        "{} has OpenStudio at version {}",
        file_name, declared
    ));

    let runtime = sdk.version()?;
    let report = compare(&declared, &runtime, &file_name)?;

    if report.prerelease() {
        let detail = format!("with a pre-release SDK ({}). Are you sure?!", report.runtime);
        output::print_banner(&[
            "/!\\ Warning /!\\ You are trying to upgrade the libraries",
            detail.as_str(),
        ]);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::fake::FakeSdk;
    use std::fs;
    use tempfile::TempDir;

    fn cmake_file(dir: &Path, major: u64, minor: u64, patch: u64) -> std::path::PathBuf {
        let path = dir.join("FindOpenStudioSDK.cmake");
        fs::write(
            &path,
            format!(
                "set(OPENSTUDIO_VERSION_MAJOR {})\nset(OPENSTUDIO_VERSION_MINOR {})\nset(OPENSTUDIO_VERSION_PATCH {})\n",
                major, minor, patch
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_matching_versions_pass() {
        let dir = TempDir::new().unwrap();
        let path = cmake_file(dir.path(), 3, 7, 0);

        let report = check(&path, &FakeSdk::new("3.7.0+d5269793f1")).unwrap();
        assert_eq!(report.declared, Version::new(3, 7, 0));
        assert!(!report.prerelease());
    }

    #[test]
    fn test_mismatch_aborts() {
        let dir = TempDir::new().unwrap();
        let path = cmake_file(dir.path(), 3, 6, 1);

        let err = check(&path, &FakeSdk::new("3.7.0")).unwrap_err();
        match err {
            OsmUpgradeError::VersionMismatch {
                declared, runtime, ..
            } => {
                assert_eq!(declared, "3.6.1");
                assert_eq!(runtime, "3.7.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prerelease_is_a_warning_only() {
        let declared = Version::new(3, 8, 0);
        let runtime = SdkVersion::parse("3.8.0-rc2").unwrap();

        let report = compare(&declared, &runtime, "FindOpenStudioSDK.cmake").unwrap();
        assert!(report.prerelease());
    }
}
