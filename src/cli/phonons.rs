//! # phonons 子命令参数
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 使用 `cli/run.rs`

use super::run::RunArgs;
use clap::Args;

/// phonons 子命令参数
#[derive(Args, Debug)]
pub struct PhononsArgs {
    #[command(flatten)]
    pub run: RunArgs,
}
