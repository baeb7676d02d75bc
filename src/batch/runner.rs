//! # 批量执行器
//!
//! 在独立的 rayon 线程池中并行执行一组任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果按输入顺序返回
//! - 第一个失败的任务使整个批次失败
//! - 进度条显示
//!
//! ## 依赖关系
//! - 被 `phonon/derivative.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{PhononError, Result};
use crate::utils::progress;

use rayon::prelude::*;

/// 批量执行器
#[derive(Debug, Clone)]
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否显示进度条
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU 核心
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    /// 关闭进度条
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行执行 `task(i)`，`i` 取 `0..count`，结果按 `i` 顺序返回
    pub fn run<T, F>(&self, count: usize, message: &str, task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        let pb = if self.show_progress {
            progress::create_progress_bar(count as u64, message)
        } else {
            indicatif::ProgressBar::hidden()
        };

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| PhononError::ThreadPool(e.to_string()))?;

        let results: Result<Vec<T>> = pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|i| {
                    let result = task(i);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();
        results
    }
}
