//! # osm-upgrade - OpenStudio 模型批量升级工具
//!
//! 把源码树中的模型文件升级到当前安装的 SDK 版本。
//!
//! ## 子命令
//! - `library`   - 按路径筛选库模型并升级
//! - `resources` - 校验 SDK 版本后升级所有版本过期的模型
//! - `check`     - 只读报告版本不一致的模型
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── gate.rs    (版本闸门)
//!   │     ├── batch/     (收集、并行执行、取消)
//!   │     ├── sdk/       (外部 SDK 契约与 openstudio 后端)
//!   │     ├── parsers/   (构建配置与版本头解析)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod gate;
mod models;
mod parsers;
mod sdk;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(e.exit_code());
    }
}
