//! # 日志初始化
//!
//! 诊断日志走 `tracing`，输出到 stderr；面向用户的消息仍由 `output.rs` 打印。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber` crate

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则按 `-v` 次数选择 warn / info / debug。
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}
