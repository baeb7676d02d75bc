//! # phonon-eph - SIESTA 有限差分声子与电声耦合
//!
//! 从一组原子位移的 SIESTA 计算出发，构建力常数并求声子模式，
//! 再由 Hamiltonian/重叠矩阵的有限差分导数得到电声耦合矩阵。
//!
//! ## 子命令
//! - `phonons` - 力常数 → 声子能量与模式（可选 Jmol / CSV 输出）
//! - `full`    - 声子 + 修正后的 `dH` + 电声耦合矩阵（`.Meph` / `.bMeph`）
//! - `show`    - 查看 `.bMeph` 二进制输出
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (输入文件解析: 运行描述、表格、稀疏二进制、力常数)
//!   │     ├── phonon/    (组装、力常数、本征求解、导数、耦合)
//!   │     ├── export/    (Meph / Jmol / CSV 输出)
//!   │     ├── batch/     (并行任务)
//!   │     ├── linalg/    (稠密矩阵分配与三维张量)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod export;
mod linalg;
mod models;
mod parsers;
mod phonon;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_failure(&e);
        std::process::exit(1);
    }
}
