//! # 模型文件收集器
//!
//! 在源码树中查找模型文件，并按路径或版本筛选。
//!
//! ## 功能
//! - 递归遍历目录，按 `*.<ext>` 匹配文件名；跳过中断的升级遗留的暂存文件
//! - 按路径正则筛选（任一匹配即保留）
//! - 按版本筛选：版本头与目标版本不同的文件
//!
//! ## 依赖关系
//! - 被 `commands/library.rs`, `commands/resources.rs`, `commands/check.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名，`rayon` 并行读取版本头

use crate::error::{OsmUpgradeError, Result};
use crate::models::{same_core, VersionMismatch};
use crate::sdk::{Sdk, STAGING_PREFIX};

use rayon::prelude::*;
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `library` 命令默认关注的目录
pub const DEFAULT_LIBRARY_PATTERNS: &[&str] = &[
    "openstudio_app/Resources",
    "sketchup_plugin/resources/templates",
    "sketchup_plugin/user_scripts",
];

/// 模型文件收集器
pub struct ModelCollector {
    /// 根目录
    root: PathBuf,
    /// 文件名模式（`*.osm`）
    name_pattern: glob::Pattern,
    /// 路径正则；为空时保留全部
    path_patterns: Vec<Regex>,
}

impl ModelCollector {
    /// 创建新的收集器，默认扩展名 `osm`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name_pattern: glob::Pattern::new("*.osm").expect("static pattern"),
            path_patterns: Vec::new(),
        }
    }

    /// 设置扩展名（不含点）
    pub fn with_extension(mut self, extension: &str) -> Result<Self> {
        let ext = extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(OsmUpgradeError::InvalidArgument(
                "Model extension must not be empty".to_string(),
            ));
        }

        let pattern = format!("*.{}", glob::Pattern::escape(ext));
        self.name_pattern = glob::Pattern::new(&pattern).map_err(|e| {
            OsmUpgradeError::InvalidArgument(format!("Invalid extension '{}': {}", extension, e))
        })?;
        Ok(self)
    }

    /// 设置路径正则
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.path_patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    OsmUpgradeError::InvalidArgument(format!(
                        "Invalid pattern '{}': {}",
                        p.as_ref(),
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 收集所有匹配的文件（排序后返回）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(OsmUpgradeError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| {
                        !name.starts_with(STAGING_PREFIX) && self.name_pattern.matches(name)
                    })
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .filter(|p| self.matches_patterns(p))
            .collect();

        files.sort();
        tracing::debug!(root = %self.root.display(), count = files.len(), "collected model files");
        Ok(files)
    }

    /// 检查路径是否匹配任一正则
    fn matches_patterns(&self, path: &Path) -> bool {
        if self.path_patterns.is_empty() {
            return true;
        }

        // 统一分隔符，使同一组正则在 Windows 上也能用
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.path_patterns.iter().any(|re| re.is_match(&normalized))
    }
}

/// 找出版本与目标不同的模型
///
/// 无法读取版本头的文件也算作不一致。结果保持输入顺序。
pub fn find_version_mismatches<S: Sdk + ?Sized>(
    sdk: &S,
    files: &[PathBuf],
    target: &Version,
) -> Result<Vec<VersionMismatch>> {
    let checked: Vec<Option<VersionMismatch>> = files
        .par_iter()
        .map(|path| -> Result<Option<VersionMismatch>> {
            let found = sdk.model_version(path)?;
            let matches = found.as_ref().map(|v| same_core(v, target)).unwrap_or(false);
            if matches {
                Ok(None)
            } else {
                tracing::debug!(model = %path.display(), found = ?found, "version mismatch");
                Ok(Some(VersionMismatch {
                    path: path.clone(),
                    found,
                }))
            }
        })
        .collect::<Result<_>>()?;

    Ok(checked.into_iter().flatten().collect())
}
