//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `library`: 按路径筛选库模型并升级
//! - `resources`: 校验 SDK 版本，升级所有版本过期的模型
//! - `check`: 只读报告版本不一致的模型
//! - `worker`: 内部命令，进程模式下升级单个模型
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, library, resources, check, worker

pub mod check;
pub mod common;
pub mod library;
pub mod resources;
pub mod worker;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// osm-upgrade - 批量升级 OpenStudio 模型文件
#[derive(Parser)]
#[command(name = "osm-upgrade")]
#[command(version)]
#[command(about = "Batch-upgrade OpenStudio model files to the installed SDK version", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// OpenStudio command-line executable
    #[arg(long, global = true, env = "OPENSTUDIO_CLI", default_value = "openstudio")]
    pub openstudio: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Upgrade library models selected by path pattern
    Library(library::LibraryArgs),

    /// Check the SDK version, then upgrade every model whose version differs
    Resources(resources::ResourcesArgs),

    /// Report models whose version differs from the target, without writing
    Check(check::CheckArgs),

    /// Upgrade a single model (used internally by --mode processes)
    #[command(hide = true)]
    Worker(worker::WorkerArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionMode;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_defaults_per_command() {
        let cli = Cli::try_parse_from(["osm-upgrade", "library", "--root", "src"]).unwrap();
        match cli.command {
            Commands::Library(args) => {
                assert_eq!(args.mode, ExecutionMode::Threads);
                assert!(args.source.patterns.is_empty());
            }
            _ => panic!("expected library"),
        }

        let cli = Cli::try_parse_from(["osm-upgrade", "resources", "-j", "3"]).unwrap();
        match cli.command {
            Commands::Resources(args) => {
                assert_eq!(args.mode, ExecutionMode::Processes);
                assert_eq!(args.run.jobs, Some(3));
            }
            _ => panic!("expected resources"),
        }
    }

    #[test]
    fn test_worker_invocation_shape() {
        let cli = Cli::try_parse_from([
            "osm-upgrade",
            "--openstudio",
            "/opt/openstudio/bin/openstudio",
            "worker",
            "a.osm",
        ])
        .unwrap();

        assert_eq!(cli.openstudio, PathBuf::from("/opt/openstudio/bin/openstudio"));
        assert!(matches!(cli.command, Commands::Worker(_)));
    }
}
