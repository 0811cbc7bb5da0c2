//! # OpenStudio 命令行后端
//!
//! 通过 `openstudio` 可执行文件调用 SDK 的版本转换器。
//!
//! ## 流程
//! ```text
//! load_model(a.osm)
//!   └── openstudio -e <ruby>   VersionTranslator.loadModel(a.osm)
//!                              → model.save(.osm-upgrade-XXXX.osm)   (暂存文件，与源文件同目录)
//! save_model(staged, a.osm)
//!   └── rename(.osm-upgrade-XXXX.osm → a.osm)                       (原子覆盖)
//! ```
//! 转换失败或被取消时暂存文件随 `NamedTempFile` 一起删除，原文件不变。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `utils/process.rs` 执行可取消的子进程
//! - 使用 `tempfile` crate

use super::Sdk;
use crate::batch::CancelToken;
use crate::error::{OsmUpgradeError, Result};
use crate::models::SdkVersion;
use crate::utils::process::run_cancellable;

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

/// 暂存文件名前缀，收集模型时跳过
pub const STAGING_PREFIX: &str = ".osm-upgrade-";

/// 转换器没有返回模型时脚本的退出码
const TRANSLATION_EMPTY_EXIT: i32 = 2;

const SOURCE_ENV: &str = "OSM_UPGRADE_SOURCE";
const TARGET_ENV: &str = "OSM_UPGRADE_TARGET";

/// 路径通过环境变量传入，避免在 Ruby 源码里转义
const TRANSLATE_SCRIPT: &str = concat!(
    "src = OpenStudio::Path.new(ENV['OSM_UPGRADE_SOURCE']); ",
    "dst = OpenStudio::Path.new(ENV['OSM_UPGRADE_TARGET']); ",
    "model = OpenStudio::OSVersion::VersionTranslator.new.loadModel(src); ",
    "exit(2) if model.empty?; ",
    "exit(model.get.save(dst, true) ? 0 : 3)"
);

/// 已转换并写入暂存文件的模型
#[derive(Debug)]
pub struct StagedModel {
    file: NamedTempFile,
}

impl StagedModel {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// 基于 `openstudio` 命令行的 SDK
#[derive(Debug, Clone)]
pub struct OpenStudioCli {
    executable: PathBuf,
    cancel: CancelToken,
}

impl OpenStudioCli {
    pub fn new(executable: impl Into<PathBuf>, cancel: CancelToken) -> Self {
        Self {
            executable: executable.into(),
            cancel,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command_name(&self) -> String {
        self.executable.display().to_string()
    }

    /// 在源文件所在目录创建暂存文件，保证之后的 rename 不跨文件系统
    fn staging_file(&self, path: &Path) -> Result<NamedTempFile> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".osm")
            .tempfile_in(&dir)
            .map_err(|e| OsmUpgradeError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })
    }
}

impl Sdk for OpenStudioCli {
    type Model = StagedModel;

    fn version(&self) -> Result<SdkVersion> {
        let output = run_cancellable(
            Command::new(&self.executable).arg("openstudio_version"),
            &self.cancel,
        )?;

        if !output.status.success() {
            return Err(OsmUpgradeError::CommandFailed {
                command: format!("{} openstudio_version", self.command_name()),
                stderr: output.stderr,
            });
        }

        let reported = output
            .stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default();

        tracing::debug!(version = reported, "openstudio reported version");
        SdkVersion::parse(reported)
    }

    fn load_model(&self, path: &Path) -> Result<Option<StagedModel>> {
        let staged = self.staging_file(path)?;

        let output = run_cancellable(
            Command::new(&self.executable)
                .arg("-e")
                .arg(TRANSLATE_SCRIPT)
                .env(SOURCE_ENV, path)
                .env(TARGET_ENV, staged.path()),
            &self.cancel,
        )?;

        tracing::debug!(
            model = %path.display(),
            status = ?output.status.code(),
            "version translator finished"
        );

        match output.status.code() {
            Some(0) => Ok(Some(StagedModel { file: staged })),
            Some(TRANSLATION_EMPTY_EXIT) => Ok(None),
            _ => Err(OsmUpgradeError::CommandFailed {
                command: format!("{} -e <version translator> ({})", self.command_name(), path.display()),
                stderr: output.stderr,
            }),
        }
    }

    fn save_model(&self, model: StagedModel, path: &Path, overwrite: bool) -> Result<bool> {
        tracing::debug!(
            staged = %model.path().display(),
            target = %path.display(),
            overwrite,
            "saving translated model"
        );

        let persisted = if overwrite {
            model.file.persist(path)
        } else {
            if path.exists() {
                return Ok(false);
            }
            model.file.persist_noclobber(path)
        };

        persisted.map_err(|e| OsmUpgradeError::FileWriteError {
            path: path.display().to_string(),
            source: e.error,
        })?;

        Ok(true)
    }
}
