//! # 力常数矩阵构建
//!
//! 1. 消除蛋格效应：令每一列在每个方向上的力之和为零（平移不变性）
//! 2. 中心差分并截取动力学原子块：`FC = (neg + pos) / 2`
//! 3. 对称化并做质量加权：`FC[i][j] = (FC[i][j] + FC[j][i]) / 2 / sqrt(m_i·m_j)`
//!
//! ## 依赖关系
//! - 被 `commands/phonons.rs` 使用
//! - 使用 `parsers/force_constants.rs`, `models/run.rs`

use crate::error::Result;
use crate::linalg;
use crate::models::{DynamicAtomSet, RunContext};
use crate::parsers::force_constants::{self, RawForceConstants};
use nalgebra::DMatrix;

/// 消除蛋格效应
///
/// 对列 `j`（位移原子 `a = first - 1 + j/3`），把 `M[3a+x][j]` 替换为
/// 其余所有原子在方向 `x` 上的力之和的相反数。
pub fn remove_egg_box(m: &mut DMatrix<f64>, dynamic: &DynamicAtomSet, n_atoms: usize) {
    for j in 0..dynamic.dof() {
        let a = dynamic.atom_of_dof(j);
        for x in 0..3 {
            m[(3 * a + x, j)] = 0.0;
            let sum: f64 = (0..n_atoms).map(|i| m[(3 * i + x, j)]).sum();
            m[(3 * a + x, j)] = -sum;
        }
    }
}

/// 中心差分并截取动力学原子行
pub fn reduce(raw: &RawForceConstants, dynamic: &DynamicAtomSet) -> Result<DMatrix<f64>> {
    let n = dynamic.dof();
    let offset = dynamic.coordinate_range().start;
    let mut fc = linalg::try_zeros(n, n, "force constants matrix")?;
    for j in 0..n {
        for i in 0..n {
            fc[(i, j)] = (raw.negative[(i + offset, j)] + raw.positive[(i + offset, j)]) / 2.0;
        }
    }
    Ok(fc)
}

/// 对称化并质量加权，`masses` 为每个动力学原子的质量
pub fn symmetrize_and_mass_scale(fc: &mut DMatrix<f64>, masses: &[f64]) {
    let n = fc.nrows();
    for j in 0..n {
        for i in j..n {
            let mean = (fc[(i, j)] + fc[(j, i)]) / 2.0;
            let scaled = mean / (masses[i / 3] * masses[j / 3]).sqrt();
            fc[(i, j)] = scaled;
            fc[(j, i)] = scaled;
        }
    }
}

/// 由原始力常数构建质量加权的动力学矩阵
pub fn build(ctx: &RunContext, mut raw: RawForceConstants) -> Result<DMatrix<f64>> {
    remove_egg_box(&mut raw.negative, ctx.dynamic(), ctx.n_atoms());
    remove_egg_box(&mut raw.positive, ctx.dynamic(), ctx.n_atoms());

    let mut fc = reduce(&raw, ctx.dynamic())?;
    let masses: Vec<f64> = ctx.dynamic_atoms().iter().map(|a| a.mass).collect();
    symmetrize_and_mass_scale(&mut fc, &masses);
    Ok(fc)
}

/// 读取 `<label>.FC` 并构建动力学矩阵
pub fn load(ctx: &RunContext) -> Result<DMatrix<f64>> {
    let raw = force_constants::read_force_constants(&ctx.fc_path(), ctx.n_atoms(), ctx.n_dof())?;
    build(ctx, raw)
}
