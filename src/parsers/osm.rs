//! # OSM 版本头解析器
//!
//! 只读取模型文件中的 `OS:Version` 对象，不解析其余内容。
//!
//! ## 格式说明
//! ```text
//! OS:Version,
//!   {bd0d5a34-1d28-4ae6-8d4a-91e3b6cfa5e4}, !- Handle
//!   3.7.0;                                  !- Version Identifier
//! ```
//! 预发布 SDK 保存的模型多一个 Prerelease Identifier 字段（`3.8.0, rc1;`），
//! 读出为 `3.8.0-rc1`。旧的 IDF 风格 `Version,8.0;` 同样支持。
//!
//! ## 依赖关系
//! - 被 `sdk/mod.rs` 的默认 `model_version` 使用
//! - 使用 `models/version.rs`

use crate::error::{OsmUpgradeError, Result};
use crate::models::parse_version;
use semver::{Prerelease, Version};
use std::fs;
use std::path::Path;

/// 读取模型文件的版本头
///
/// 文件中没有版本对象或版本字段无法解析时返回 `Ok(None)`。
pub fn read_model_version(path: &Path) -> Result<Option<Version>> {
    let bytes = fs::read(path).map_err(|e| OsmUpgradeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(parse_model_version(&String::from_utf8_lossy(&bytes)))
}

/// 从字符串内容提取版本
pub fn parse_model_version(content: &str) -> Option<Version> {
    // 先去掉 `!-` 注释，再按对象（`;` 结尾）切分
    let stripped: String = content
        .lines()
        .map(|line| match line.find('!') {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    for object in stripped.split(';') {
        let fields: Vec<&str> = object.split(',').map(str::trim).collect();
        let Some(class) = fields.first() else {
            continue;
        };

        if class.eq_ignore_ascii_case("OS:Version") || class.eq_ignore_ascii_case("Version") {
            // Handle 解析不出版本，第一个能解析的字段就是 Version Identifier
            let (idx, mut version) = fields
                .iter()
                .enumerate()
                .skip(1)
                .find_map(|(i, f)| parse_version(f).ok().map(|v| (i, v)))?;

            if version.pre.is_empty() {
                if let Some(tag) = fields.get(idx + 1).filter(|f| !f.is_empty()) {
                    version.pre = Prerelease::new(tag).unwrap_or(Prerelease::EMPTY);
                }
            }
            return Some(version);
        }
    }

    None
}
