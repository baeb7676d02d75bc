//! # 稠密矩阵组装
//!
//! 将（可能跨越超胞的）稀疏矩阵折叠为晶胞内的稠密矩阵：
//! 列索引按 `(c - 1) mod n` 回绕，重复位置累加。
//! Hamiltonian 转换为 eV，并按该次计算的费米能平移 `H -= ef·S`。
//!
//! ## 依赖关系
//! - 被 `phonon/derivative.rs` 和 `commands/full.rs` 使用
//! - 使用 `parsers/sparse.rs`, `linalg`

use crate::error::Result;
use crate::linalg;
use crate::models::constants::RYDBERG_TO_EV;
use crate::models::RunContext;
use crate::parsers::sparse::{self, Anomaly, SparseMatrix};
use nalgebra::DMatrix;

/// 一次计算的稠密 Hamiltonian（每个自旋一个，eV）与重叠矩阵
#[derive(Debug, Clone)]
pub struct HamiltonianOverlap {
    pub hamiltonian: Vec<DMatrix<f64>>,
    pub overlap: DMatrix<f64>,
}

/// 把一个数值平面累加到 `n × n` 稠密矩阵
fn fold_plane(sparse: &SparseMatrix, values: &[f64], n: usize, scale: f64, dense: &mut DMatrix<f64>) {
    for (row, col, k) in sparse.entries() {
        dense[(row, (col - 1) % n)] += scale * values[k];
    }
}

/// 组装 `.gHS` 矩阵，并按费米能 `ef` 平移
pub fn assemble_hamiltonian(sparse: &SparseMatrix, no_u: usize, ef: f64) -> Result<HamiltonianOverlap> {
    let mut overlap = linalg::try_zeros(no_u, no_u, "overlap matrix")?;
    fold_plane(sparse, &sparse.overlap, no_u, 1.0, &mut overlap);

    let mut hamiltonian = Vec::with_capacity(sparse.hamiltonian.len());
    for plane in &sparse.hamiltonian {
        let mut h = linalg::try_zeros(no_u, no_u, "Hamiltonian matrix")?;
        fold_plane(sparse, plane, no_u, RYDBERG_TO_EV, &mut h);
        h -= &overlap * ef;
        hamiltonian.push(h);
    }

    Ok(HamiltonianOverlap {
        hamiltonian,
        overlap,
    })
}

/// 组装 `.onlyS` 重叠矩阵
///
/// 文件中的基组为 `2·no_u`（未位移与位移后的原子各一份），
/// 结果为交叉块 `S[i][j] = (Sbig[i][j+no_u] + Sbig[j+no_u][i]) / 2`。
pub fn assemble_cross_overlap(sparse: &SparseMatrix, no_u: usize) -> Result<DMatrix<f64>> {
    let n = 2 * no_u;
    let mut big = linalg::try_zeros(n, n, "doubled overlap matrix")?;
    fold_plane(sparse, &sparse.overlap, n, 1.0, &mut big);

    let mut s = linalg::try_zeros(no_u, no_u, "overlap matrix")?;
    for j in 0..no_u {
        for i in 0..no_u {
            s[(i, j)] = (big[(i, j + no_u)] + big[(j + no_u, i)]) / 2.0;
        }
    }
    Ok(s)
}

/// 读取并组装第 `idx` 次计算的 `.gHS` 文件
pub fn load_hamiltonian(
    ctx: &RunContext,
    idx: usize,
    no_u: usize,
    ef: f64,
) -> Result<(HamiltonianOverlap, Option<Anomaly>)> {
    let (sparse, anomaly) = sparse::read_ghs(&ctx.ghs_path(idx), no_u, ctx.nspin())?;
    Ok((assemble_hamiltonian(&sparse, no_u, ef)?, anomaly))
}

/// 读取并组装第 `n` 个 `.onlyS` 文件
pub fn load_cross_overlap(
    ctx: &RunContext,
    n: usize,
    no_u: usize,
) -> Result<(DMatrix<f64>, Option<Anomaly>)> {
    let (sparse, anomaly) = sparse::read_only_s(&ctx.only_s_path(n), no_u)?;
    Ok((assemble_cross_overlap(&sparse, no_u)?, anomaly))
}
