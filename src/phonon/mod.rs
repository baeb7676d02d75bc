//! # 声子与电声耦合计算核心
//!
//! 数据流：
//! ```text
//! sparse reader → assembler ─┬→ force_constants → solver ─┐
//!                            └→ derivative ───────────────┴→ coupling
//! ```
//! 核心计算不打印任何内容，读取异常作为返回值交给命令层报告。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/`, `models/`, `linalg`, `batch/`
//! - 子模块: assembler, force_constants, solver, derivative, coupling

pub mod assembler;
pub mod coupling;
pub mod derivative;
pub mod force_constants;
pub mod solver;

#[cfg(test)]
pub(crate) mod fixtures;
