//! # full 子命令参数
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 使用 `cli/run.rs`

use super::run::RunArgs;
use clap::Args;

/// full 子命令参数
#[derive(Args, Debug)]
pub struct FullArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Number of parallel jobs for the derivative tasks (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Skip the text coupling file and write only the binary .bMeph
    #[arg(long, default_value_t = false)]
    pub binary_only: bool,

    /// Hide the progress bar of the derivative tasks
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
