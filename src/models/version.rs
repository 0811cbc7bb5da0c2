//! # 版本数据模型
//!
//! 模型文件版本与 SDK 运行时版本。
//!
//! ## 版本格式
//! ```text
//! 3.7.0              正式版
//! 3.8.0-rc1+a1b2c3   预发布版（带构建元数据）
//! 8.0                旧格式，patch 缺省为 0
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/`, `sdk/`, `gate.rs`, `batch/collector.rs` 使用
//! - 使用 `semver` crate

use crate::error::{OsmUpgradeError, Result};
use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::OnceLock;

/// 宽松解析版本号
///
/// 先尝试严格的 semver；失败时退回到 `major.minor[.patch]` 前缀。
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    if let Ok(v) = Version::parse(trimmed) {
        return Ok(v);
    }

    static LENIENT: OnceLock<Regex> = OnceLock::new();
    let re = LENIENT.get_or_init(|| Regex::new(r"^v?(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

    let caps = re
        .captures(trimmed)
        .ok_or_else(|| OsmUpgradeError::InvalidVersion {
            input: trimmed.to_string(),
            reason: "expected major.minor[.patch]".to_string(),
        })?;

    let number = |i: usize| -> Result<u64> {
        caps.get(i)
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map(|n| n.unwrap_or(0))
            .map_err(|e| OsmUpgradeError::InvalidVersion {
                input: trimmed.to_string(),
                reason: e.to_string(),
            })
    };

    Ok(Version::new(number(1)?, number(2)?, number(3)?))
}

/// 只比较 `major.minor.patch`
pub fn same_core(a: &Version, b: &Version) -> bool {
    (a.major, a.minor, a.patch) == (b.major, b.minor, b.patch)
}

/// SDK 运行时版本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkVersion {
    pub version: Version,
}

impl SdkVersion {
    /// 从 SDK 自报的版本字符串解析
    pub fn parse(input: &str) -> Result<Self> {
        Ok(SdkVersion {
            version: parse_version(input)?,
        })
    }

    /// 不含预发布标签和构建元数据的核心版本
    pub fn core(&self) -> Version {
        Version::new(self.version.major, self.version.minor, self.version.patch)
    }

    /// 是否为预发布构建（如 `-rc1`, `-alpha`）
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}
