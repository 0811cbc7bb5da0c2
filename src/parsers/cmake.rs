//! # 构建配置版本解析器
//!
//! 从 CMake 构建配置文件（如 `FindOpenStudioSDK.cmake`）中提取声明的 SDK 版本。
//!
//! ## 支持的格式
//! ```text
//! set(OPENSTUDIO_VERSION_MAJOR 3)
//! set(OPENSTUDIO_VERSION_MINOR 7)
//! set(OPENSTUDIO_VERSION_PATCH 0)
//! ```
//! 或任意 key 中含 `VERSION` 的键值行：
//! ```text
//! set(SDK_VERSION "3.7.0")
//! OPENSTUDIO_VERSION=3.7.0
//! ```
//!
//! ## 依赖关系
//! - 被 `gate.rs` 使用
//! - 使用 `regex`, `semver`

use crate::error::{OsmUpgradeError, Result};
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// 读取并解析构建配置文件
pub fn parse_cmake_file(path: &Path) -> Result<Version> {
    if !path.is_file() {
        return Err(OsmUpgradeError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| OsmUpgradeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_cmake_version(&content).ok_or_else(|| OsmUpgradeError::ParseError {
        format: "CMake".to_string(),
        path: path.display().to_string(),
        reason: "no major.minor.patch version declaration found".to_string(),
    })
}

/// 从字符串内容提取版本
pub fn parse_cmake_version(content: &str) -> Option<Version> {
    parse_component_triplet(content).or_else(|| parse_key_value(content))
}

/// `set(OPENSTUDIO_VERSION_MAJOR 3)` 三行形式
fn parse_component_triplet(content: &str) -> Option<Version> {
    static TRIPLET: OnceLock<Regex> = OnceLock::new();
    let re = TRIPLET.get_or_init(|| {
        Regex::new(r#"(?im)^\s*set\s*\(\s*OPENSTUDIO_VERSION_(MAJOR|MINOR|PATCH)\s+"?(\d+)"?\s*\)"#)
            .unwrap()
    });

    let mut major = None;
    let mut minor = None;
    let mut patch = None;

    for caps in re.captures_iter(content) {
        let value = caps[2].parse::<u64>().ok();
        match caps[1].to_uppercase().as_str() {
            "MAJOR" => major = value,
            "MINOR" => minor = value,
            "PATCH" => patch = value,
            _ => {}
        }
    }

    Some(Version::new(major?, minor?, patch?))
}

/// 键值行形式，取第一个匹配
fn parse_key_value(content: &str) -> Option<Version> {
    static KEY_VALUE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_VALUE.get_or_init(|| {
        Regex::new(r#"(?im)^\s*(?:set\s*\(\s*)?[A-Z0-9_]*VERSION[A-Z0-9_]*\s*(?:=|:|\s)\s*"?(\d+)\.(\d+)\.(\d+)"#)
            .unwrap()
    });

    let caps = re.captures(content)?;
    Some(Version::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}
