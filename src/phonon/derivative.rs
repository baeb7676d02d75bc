//! # Hamiltonian 与重叠矩阵导数
//!
//! 中心差分：
//! - `dH[k,s] = (H₊ − H₋ − (ef₊ − ef₋)·S0) / 2d`
//! - `dS[x]   = (S₊ − S₋) / 2d`
//!
//! 基组随原子移动带来的修正（`D` 仅在原子 `a` 的轨道行上非零，`D[p][q] = dS[x][q][p]`）：
//! `dH ← dH − D·S0⁻¹·H0 − H0·S0⁻¹·Dᵀ`
//!
//! 每个自由度的文件读取、差分与修正相互独立，通过 `BatchRunner` 并行执行，
//! 结果按自由度顺序收集。
//!
//! ## 依赖关系
//! - 被 `commands/full.rs` 使用
//! - 使用 `phonon/assembler.rs`, `batch/runner.rs`, `linalg`

use super::assembler::{self, HamiltonianOverlap};
use crate::batch::BatchRunner;
use crate::error::{PhononError, Result};
use crate::linalg::{self, Tensor3};
use crate::models::{ElectronicInputs, RunContext};
use crate::parsers::sparse::Anomaly;
use nalgebra::DMatrix;
use std::ops::Range;

/// 通过 LU 分解求 `S0⁻¹`
pub fn invert_overlap(s0: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let inverse = s0
        .clone()
        .lu()
        .try_inverse()
        .ok_or_else(|| PhononError::SingularMatrix {
            what: "S0".to_string(),
        })?;
    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(PhononError::SingularMatrix {
            what: "S0".to_string(),
        });
    }
    Ok(inverse)
}

/// 单个自由度的 Hamiltonian 中心差分，每个自旋一个平面
pub fn central_difference(
    plus: &HamiltonianOverlap,
    minus: &HamiltonianOverlap,
    fermi_shift: f64,
    s0: &DMatrix<f64>,
    displacement: f64,
) -> Vec<DMatrix<f64>> {
    plus.hamiltonian
        .iter()
        .zip(&minus.hamiltonian)
        .map(|(hp, hm)| (hp - hm - s0 * fermi_shift) / (2.0 * displacement))
        .collect()
}

/// 原子轨道行上的重叠矩阵导数块 `D[p][q] = dS[q][p]`（`p` 属于 `orbitals`）
pub fn displacement_block(ds: &DMatrix<f64>, orbitals: Range<usize>) -> Result<DMatrix<f64>> {
    let n = ds.nrows();
    let mut d = linalg::try_zeros(n, n, "overlap derivative block")?;
    for p in orbitals {
        for q in 0..n {
            d[(p, q)] = ds[(q, p)];
        }
    }
    Ok(d)
}

/// 基组修正：`dh ← dh − D·S0⁻¹·H0 − H0·S0⁻¹·Dᵀ`
pub fn correct(
    dh: &mut DMatrix<f64>,
    d: &DMatrix<f64>,
    s0_inv: &DMatrix<f64>,
    h0: &DMatrix<f64>,
) -> Result<()> {
    let n = dh.nrows();
    let mut aux = linalg::try_zeros(n, n, "correction workspace")?;

    aux.gemm(-1.0, d, s0_inv, 0.0);
    dh.gemm(1.0, &aux, h0, 1.0);

    aux.gemm(1.0, h0, s0_inv, 0.0);
    dh.gemm(-1.0, &aux, &d.transpose(), 1.0);
    Ok(())
}

/// 三个方向的重叠矩阵导数 `dS[x]`
pub fn overlap_derivatives(ctx: &RunContext, no_u: usize) -> Result<(Vec<DMatrix<f64>>, Vec<Anomaly>)> {
    let mut planes = Vec::with_capacity(3);
    let mut anomalies = Vec::new();
    for x in 0..3 {
        let (minus, a) = assembler::load_cross_overlap(ctx, 2 * x + 1, no_u)?;
        anomalies.extend(a);
        let (plus, a) = assembler::load_cross_overlap(ctx, 2 * x + 2, no_u)?;
        anomalies.extend(a);
        planes.push((plus - minus) / (2.0 * ctx.displacement()));
    }
    Ok((planes, anomalies))
}

/// 修正后的 Hamiltonian 导数
///
/// 返回平面数为 `3·nDyn·nspin` 的张量，平面下标 `k·nspin + s`。
pub fn hamiltonian_derivatives(
    ctx: &RunContext,
    inputs: &ElectronicInputs,
    reference: &HamiltonianOverlap,
    ds: &[DMatrix<f64>],
    s0_inv: &DMatrix<f64>,
    runner: &BatchRunner,
) -> Result<(Tensor3, Vec<Anomaly>)> {
    let no_u = inputs.orbitals.no_u();
    let fermi = &inputs.fermi;

    let per_dof = runner.run(ctx.n_dof(), "dH", |k| {
        let mut anomalies = Vec::new();

        let (minus, a) = assembler::load_hamiltonian(ctx, 2 * k + 1, no_u, fermi.negative(k))?;
        anomalies.extend(a);
        let (plus, a) = assembler::load_hamiltonian(ctx, 2 * k + 2, no_u, fermi.positive(k))?;
        anomalies.extend(a);

        let shift = fermi.positive(k) - fermi.negative(k);
        let mut planes =
            central_difference(&plus, &minus, shift, &reference.overlap, ctx.displacement());

        let atom = ctx.dynamic().atom_of_dof(k);
        let d = displacement_block(&ds[k % 3], inputs.orbitals.orbitals(atom))?;
        for (plane, h0) in planes.iter_mut().zip(&reference.hamiltonian) {
            correct(plane, &d, s0_inv, h0)?;
        }

        Ok((planes, anomalies))
    })?;

    let mut planes = Vec::with_capacity(ctx.n_dof() * ctx.nspin());
    let mut anomalies = Vec::new();
    for (p, a) in per_dof {
        planes.extend(p);
        anomalies.extend(a);
    }
    Ok((Tensor3::from_planes(planes)?, anomalies))
}
