//! # 声子本征值求解
//!
//! 对质量加权力常数矩阵做对称本征分解，本征对按本征值升序排列。
//! 本征值换算为声子能量 `E = C·sqrt(λ)`；负本征值对应不稳定模式，
//! 记录带符号能量 `-C·sqrt(-λ)`，后续计算使用截断能量 0。
//!
//! ## 依赖关系
//! - 被 `commands/phonons.rs` 使用
//! - 使用 `nalgebra::SymmetricEigen`

use crate::error::{PhononError, Result};
use crate::models::constants::phonon_energy_factor;
use crate::models::PhononSpectrum;
use nalgebra::DMatrix;

/// Jacobi/QR 迭代上限
pub const MAX_EIGEN_ITERATIONS: usize = 10_000;

/// 求解声子谱
pub fn solve(fc: DMatrix<f64>) -> Result<PhononSpectrum> {
    if !fc.is_square() {
        return Err(PhononError::EigenSolverFailed {
            what: "force constants matrix".to_string(),
            reason: format!("matrix is {}x{}, not square", fc.nrows(), fc.ncols()),
        });
    }
    if fc.iter().any(|v| !v.is_finite()) {
        return Err(PhononError::EigenSolverFailed {
            what: "force constants matrix".to_string(),
            reason: "matrix has non-finite entries".to_string(),
        });
    }

    let n = fc.nrows();
    let eigen = fc
        .try_symmetric_eigen(f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or_else(|| PhononError::EigenSolverFailed {
            what: "force constants matrix".to_string(),
            reason: format!("no convergence after {} iterations", MAX_EIGEN_ITERATIONS),
        })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let eigenvalues: Vec<f64> = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let modes = DMatrix::from_fn(n, n, |r, c| eigen.eigenvectors[(r, order[c])]);

    let c = phonon_energy_factor();
    let signed_energies: Vec<f64> = eigenvalues
        .iter()
        .map(|&l| if l < 0.0 { -c * (-l).sqrt() } else { c * l.sqrt() })
        .collect();
    let unstable: Vec<bool> = eigenvalues.iter().map(|&l| l < 0.0).collect();
    let energies: Vec<f64> = signed_energies.iter().map(|&e| e.max(0.0)).collect();

    Ok(PhononSpectrum {
        eigenvalues,
        signed_energies,
        energies,
        modes,
        unstable,
    })
}
