//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `phonons`: 力常数 → 声子能量与模式
//! - `full`: 声子 + Hamiltonian 导数 + 电声耦合矩阵
//! - `show`: 查看 `.bMeph` 二进制输出
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, phonons, full, show

pub mod full;
pub mod phonons;
pub mod run;
pub mod show;

use clap::{Parser, Subcommand};

/// phonon-eph - SIESTA 有限差分声子与电声耦合
#[derive(Parser)]
#[command(name = "phonon-eph")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Phonon modes and electron-phonon coupling from SIESTA finite-difference runs",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Build force constants and solve for phonon energies and modes
    Phonons(phonons::PhononsArgs),

    /// Phonons plus Hamiltonian derivatives and the electron-phonon coupling matrices
    Full(full::FullArgs),

    /// Inspect a binary coupling-matrix file (.bMeph)
    Show(show::ShowArgs),
}
