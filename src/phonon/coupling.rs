//! # 电声耦合矩阵
//!
//! `Meph[l,s][i,j] = Σ_k dH[k,s][f+i, f+j] · V[k,l] · C / sqrt(2 · m(k) · E[l])`
//!
//! `f` 为第一个动力学原子的第一个轨道，`E` 为截断能量 (eV)。
//! 能量不为正的模式没有耦合块。
//!
//! ## 依赖关系
//! - 被 `commands/full.rs` 使用
//! - 使用 `linalg::Tensor3`, `models/spectrum.rs`

use crate::error::{PhononError, Result};
use crate::linalg::{self, Tensor3};
use crate::models::constants::phonon_energy_factor;
use crate::models::{CouplingTensor, ElectronicInputs, PhononSpectrum, RunContext};

/// 由修正后的 `dH` 与声子谱计算耦合张量
pub fn compute(
    ctx: &RunContext,
    inputs: &ElectronicInputs,
    spectrum: &PhononSpectrum,
    dh: &Tensor3,
) -> Result<CouplingTensor> {
    let nspin = ctx.nspin();
    let n_dof = ctx.n_dof();
    let f = inputs.first_orbital(ctx);
    let n_orb = inputs.n_orb(ctx);
    let c = phonon_energy_factor();

    let no_u = inputs.orbitals.no_u();
    if dh.n_planes() != n_dof * nspin || dh.shape() != (no_u, no_u) {
        return Err(PhononError::InvalidArgument(format!(
            "dH tensor is {} planes of {:?}, expected {} planes of {}x{}",
            dh.n_planes(),
            dh.shape(),
            n_dof * nspin,
            no_u,
            no_u
        )));
    }

    let mut tensor = CouplingTensor::new(spectrum.n_modes(), nspin);

    for (l, &energy) in spectrum.energies.iter().enumerate() {
        if energy <= 0.0 {
            continue;
        }
        for s in 0..nspin {
            let mut block = linalg::try_zeros(n_orb, n_orb, "electron-phonon coupling block")?;
            for k in 0..n_dof {
                let weight =
                    spectrum.modes[(k, l)] * c / (2.0 * ctx.mass_of_dof(k) * energy).sqrt();
                let view = dh.plane(k * nspin + s).view((f, f), (n_orb, n_orb));
                block += view * weight;
            }
            tensor.set_block(l, s, block);
        }
    }

    Ok(tensor)
}
