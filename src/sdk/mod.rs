//! # SDK 抽象层
//!
//! 模型的加载、版本转换和保存都委托给外部 SDK。本模块只定义调用契约：
//!
//! ```text
//! exists(path) -> bool
//! load_model(path) -> Option<Model>      (必要时自动做版本转换)
//! save_model(model, path, overwrite) -> bool
//! version() -> SdkVersion
//! model_version(path) -> Option<Version> (只读版本头)
//! ```
//!
//! ## 依赖关系
//! - 被 `batch/`, `gate.rs`, `commands/` 使用
//! - 子模块: openstudio (基于 `openstudio` 命令行的实现)

pub mod openstudio;

#[cfg(test)]
pub mod fake;

pub use openstudio::{OpenStudioCli, STAGING_PREFIX};

use crate::error::{OsmUpgradeError, Result};
use crate::models::SdkVersion;
use crate::parsers::osm;

use semver::Version;
use std::path::Path;

/// 外部 SDK 的调用契约
pub trait Sdk: Send + Sync {
    /// 已加载（并已转换到当前版本）的模型
    type Model: Send;

    /// SDK 自报的运行时版本
    fn version(&self) -> Result<SdkVersion>;

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// 读取模型文件的版本头，不做转换
    fn model_version(&self, path: &Path) -> Result<Option<Version>> {
        osm::read_model_version(path)
    }

    /// 加载模型，必要时做版本转换；转换器没有结果时返回 `Ok(None)`
    fn load_model(&self, path: &Path) -> Result<Option<Self::Model>>;

    /// 保存模型；`overwrite` 为假且目标已存在时返回 `Ok(false)`
    fn save_model(&self, model: Self::Model, path: &Path, overwrite: bool) -> Result<bool>;
}

/// 对单个模型执行 Load → Translate → Save
///
/// 任何一步失败都返回错误，由调用方中止整批任务。
pub fn upgrade_model<S: Sdk + ?Sized>(sdk: &S, path: &Path) -> Result<()> {
    let shown = path.display().to_string();

    if !sdk.exists(path) {
        return Err(OsmUpgradeError::ModelNotFound { path: shown });
    }

    let model = sdk
        .load_model(path)?
        .ok_or_else(|| OsmUpgradeError::TranslationFailed {
            path: shown.clone(),
        })?;

    if !sdk.save_model(model, path, true)? {
        return Err(OsmUpgradeError::SaveFailed { path: shown });
    }

    tracing::info!(model = %shown, "upgraded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeSdk, SdkCall};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_upgrade_model_saves_with_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.osm");
        fs::write(&path, FakeSdk::osm("3.0.0")).unwrap();

        let sdk = FakeSdk::new("3.7.0");
        upgrade_model(&sdk, &path).unwrap();

        assert_eq!(
            sdk.calls(),
            vec![
                SdkCall::Load(path.clone()),
                SdkCall::Save(path.clone(), true)
            ]
        );
        assert_eq!(
            osm::read_model_version(&path).unwrap(),
            Some(Version::new(3, 7, 0))
        );
    }

    #[test]
    fn test_upgrade_model_logs_with_subscriber() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logged.osm");
        fs::write(&path, FakeSdk::osm("3.0.0")).unwrap();

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let sdk = FakeSdk::new("3.7.0");
        tracing::subscriber::with_default(subscriber, || upgrade_model(&sdk, &path)).unwrap();

        assert_eq!(sdk.calls().len(), 2);
    }

    #[test]
    fn test_upgrade_model_missing_file() {
        let dir = TempDir::new().unwrap();
        let sdk = FakeSdk::new("3.7.0");
        let err = upgrade_model(&sdk, &dir.path().join("gone.osm")).unwrap_err();

        assert!(matches!(err, OsmUpgradeError::ModelNotFound { .. }));
        assert!(sdk.calls().is_empty());
    }

    #[test]
    fn test_upgrade_model_translation_failure_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.osm");
        fs::write(&path, FakeSdk::osm("1.0.0")).unwrap();

        let sdk = FakeSdk::new("3.7.0").failing_load(&path);
        let err = upgrade_model(&sdk, &path).unwrap_err();

        assert!(matches!(err, OsmUpgradeError::TranslationFailed { .. }));
        assert_eq!(sdk.calls(), vec![SdkCall::Load(path.clone())]);
        assert_eq!(
            osm::read_model_version(&path).unwrap(),
            Some(Version::new(1, 0, 0))
        );
    }

    #[test]
    fn test_upgrade_model_refused_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ro.osm");
        fs::write(&path, FakeSdk::osm("3.0.0")).unwrap();

        let sdk = FakeSdk::new("3.7.0").refusing_save();
        let err = upgrade_model(&sdk, &path).unwrap_err();
        assert!(matches!(err, OsmUpgradeError::SaveFailed { .. }));
    }
}
