//! # 声子谱 CSV 导出
//!
//! 列：`mode, eigenvalue, energy_ev, unstable`，`energy_ev` 为带符号能量。
//!
//! ## 依赖关系
//! - 被 `commands/phonons.rs` 调用
//! - 使用 `csv` + `serde` 序列化

use crate::error::{PhononError, Result};
use crate::models::PhononSpectrum;

use serde::Serialize;
use std::path::Path;

/// CSV 中的一行
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumRecord {
    pub mode: usize,
    pub eigenvalue: f64,
    pub energy_ev: f64,
    pub unstable: bool,
}

/// 声子谱转为记录（模式从 1 编号）
pub fn records(spectrum: &PhononSpectrum) -> Vec<SpectrumRecord> {
    (0..spectrum.n_modes())
        .map(|i| SpectrumRecord {
            mode: i + 1,
            eigenvalue: spectrum.eigenvalues[i],
            energy_ev: spectrum.signed_energies[i],
            unstable: spectrum.unstable[i],
        })
        .collect()
}

/// 导出为 CSV 文件
pub fn to_csv(spectrum: &PhononSpectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for record in records(spectrum) {
        wtr.serialize(record)?;
    }

    wtr.flush()
        .map_err(|e| PhononError::write(output_path, e))?;

    Ok(())
}
