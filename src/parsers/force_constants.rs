//! # SIESTA 力常数文件解析器
//!
//! `<label>.FC` 文本文件：首行以 `Force constants matrix` 开头，
//! 之后对每个自由度列 j，依次给出负位移的 `3·n_atoms` 个值和正位移的 `3·n_atoms` 个值
//! (eV/Å²，列主序)。
//!
//! ## 依赖关系
//! - 被 `phonon/force_constants.rs` 使用
//! - 使用 `linalg` 分配矩阵

use super::{read_text, Tokens};
use crate::error::{PhononError, Result};
use crate::linalg;
use nalgebra::DMatrix;
use std::path::Path;

const FC_HEADER: &str = "Force constants matrix";

/// 未处理的力常数矩阵（完整体系行 × 动力学自由度列）
#[derive(Debug, Clone)]
pub struct RawForceConstants {
    pub negative: DMatrix<f64>,
    pub positive: DMatrix<f64>,
}

/// 读取力常数文件
pub fn read_force_constants(path: &Path, n_atoms: usize, n_dof: usize) -> Result<RawForceConstants> {
    let content = read_text(path)?;
    parse_force_constants(&content, path, n_atoms, n_dof)
}

pub fn parse_force_constants(
    content: &str,
    path: &Path,
    n_atoms: usize,
    n_dof: usize,
) -> Result<RawForceConstants> {
    let (header, body) = content.split_once('\n').unwrap_or((content, ""));
    if !header.starts_with(FC_HEADER) {
        return Err(PhononError::HeaderMismatch {
            path: path.display().to_string(),
            expected: FC_HEADER.to_string(),
        });
    }

    let rows = 3 * n_atoms;
    let mut negative = linalg::try_zeros(rows, n_dof, "force constants (negative)")?;
    let mut positive = linalg::try_zeros(rows, n_dof, "force constants (positive)")?;

    let mut t = Tokens::new(body, "force constants", path);
    for j in 0..n_dof {
        for i in 0..rows {
            negative[(i, j)] = t.next("force constant")?;
        }
        for i in 0..rows {
            positive[(i, j)] = t.next("force constant")?;
        }
    }

    Ok(RawForceConstants { negative, positive })
}
