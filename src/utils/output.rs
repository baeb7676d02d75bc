//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use crate::error::PhononError;
use crate::parsers::sparse::Anomaly;
use colored::Colorize;
use nalgebra::DMatrix;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印带类别的错误
pub fn print_failure(err: &PhononError) {
    eprintln!(
        "{} {} {}",
        "[ERR]".red().bold(),
        format!("({} error)", err.class()).dimmed(),
        err
    );
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印读取异常
pub fn print_anomalies(anomalies: &[Anomaly]) {
    for a in anomalies {
        print_warning(&format!("{} (suspect input)", a));
    }
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印写出文件消息
pub fn print_written(what: &str, path: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        what.dimmed(),
        "->".cyan(),
        path
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印稠密矩阵（`% .5e` 格式）
pub fn print_matrix(m: &DMatrix<f64>) {
    for i in 0..m.nrows() {
        let row: String = (0..m.ncols())
            .map(|j| format!(" {}  ", crate::export::c_exp_signed(m[(i, j)], 5)))
            .collect();
        println!("{}", row);
    }
}
