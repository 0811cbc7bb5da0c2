//! # 批量执行器
//!
//! 在有界 worker 池中并行执行逐文件的升级操作。
//!
//! ## 功能
//! - 基于 rayon 的线程池；worker 数为 0 时在调用线程内顺序执行
//! - 进度条显示
//! - 快速失败：任何一个文件失败即置位中止标志，不再启动新文件，
//!   返回第一个真正的失败（而不是其他 worker 因中止产生的 `Cancelled`）
//! - 汇总处理数量与耗时
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `batch/cancel.rs` 的中止标志

use crate::batch::CancelToken;
use crate::error::{OsmUpgradeError, Result};
use crate::models::WorkerPoolConfig;
use crate::utils::{output, progress};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 批量处理结果统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    /// 成功处理的文件数
    pub processed: usize,
    /// 墙钟耗时
    pub elapsed: Duration,
}

impl BatchSummary {
    /// 耗时（分钟，保留一位小数）
    pub fn elapsed_minutes(&self) -> f64 {
        (self.elapsed.as_secs_f64() / 60.0 * 10.0).round() / 10.0
    }

    /// 汇总行
    pub fn message(&self) -> String {
        format!(
            "Finished updating {} files, time elapsed = {:.1} min",
            self.processed,
            self.elapsed_minutes()
        )
    }
}

/// 批量执行器
pub struct BatchRunner {
    config: WorkerPoolConfig,
    cancel: CancelToken,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(config: WorkerPoolConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// 并行处理文件列表
    ///
    /// 全部成功时返回汇总；否则返回第一个失败。
    pub fn run<F>(&self, files: &[PathBuf], message: &str, processor: F) -> Result<BatchSummary>
    where
        F: Fn(&Path) -> Result<()> + Sync + Send,
    {
        let start = Instant::now();
        let pb = progress::maybe_progress_bar(self.config.progress, files.len() as u64, message);

        let processed = AtomicUsize::new(0);
        let first_failure: Mutex<Option<OsmUpgradeError>> = Mutex::new(None);

        let process_one = |path: &PathBuf| -> Result<()> {
            // 中止后不再启动新文件
            self.cancel.check()?;

            pb.suspend(|| output::print_start(&path.display().to_string()));

            match processor(path.as_path()) {
                Ok(()) => {
                    processed.fetch_add(1, Ordering::SeqCst);
                    pb.inc(1);
                    Ok(())
                }
                Err(e) => {
                    self.cancel.cancel();
                    if !e.is_cancelled() {
                        tracing::error!(model = %path.display(), error = %e, "aborting batch");
                        let mut slot = first_failure.lock().unwrap_or_else(|p| p.into_inner());
                        if slot.is_none() {
                            *slot = Some(e);
                            return Err(OsmUpgradeError::Cancelled);
                        }
                    }
                    Err(e)
                }
            }
        };

        tracing::info!(
            files = files.len(),
            workers = self.config.workers,
            mode = %self.config.mode,
            "starting batch"
        );

        let outcome = if self.config.workers == 0 {
            files.iter().try_for_each(process_one)
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers)
                .thread_name(|i| format!("osm-upgrade-{}", i))
                .build()
                .map_err(|e| OsmUpgradeError::Other(format!("Failed to build worker pool: {}", e)))?;

            pool.install(|| files.par_iter().try_for_each(process_one))
        };

        pb.finish_and_clear();

        if let Err(e) = outcome {
            let recorded = first_failure
                .into_inner()
                .unwrap_or_else(|p| p.into_inner());
            return Err(recorded.unwrap_or(e));
        }

        Ok(BatchSummary {
            processed: processed.load(Ordering::SeqCst),
            elapsed: start.elapsed(),
        })
    }
}
