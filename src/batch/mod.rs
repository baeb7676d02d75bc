//! # 批量处理模块
//!
//! 提供有序、快速失败的并行任务执行。
//!
//! ## 功能
//! - 可配置的线程数
//! - 并行处理
//! - 进度反馈
//!
//! ## 依赖关系
//! - 被 `phonon/derivative.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::BatchRunner;
