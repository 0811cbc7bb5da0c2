//! # 解析器模块
//!
//! 提供构建配置文件与模型版本头的解析器。
//!
//! ## 依赖关系
//! - 被 `gate.rs`, `sdk/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: cmake, osm

pub mod cmake;
pub mod osm;
