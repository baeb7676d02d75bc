//! # show 子命令参数
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用

use clap::Args;
use std::path::PathBuf;

/// show 子命令参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Binary coupling-matrix file (.bMeph)
    pub input: PathBuf,

    /// Number of modes to list (highest energy first, 0 = all)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub top_n: usize,

    /// Print every coupling block in full
    #[arg(long, default_value_t = false)]
    pub blocks: bool,
}
