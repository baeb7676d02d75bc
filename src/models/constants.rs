//! # 物理常数
//!
//! CODATA 2012 常数，与 SIESTA 输出单位保持一致。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `phonon/`, `commands/` 使用
//! - 无外部模块依赖

/// 约化普朗克常数 (eV·s)
pub const HBAR: f64 = 6.58211928e-16;

/// 原子质量单位 -> kg
pub const AMU_TO_KG: f64 = 1.660538921e-27;

/// eV -> J
pub const EV_TO_JOULE: f64 = 1.602176565e-19;

/// Bohr -> Å
pub const BOHR_TO_ANG: f64 = 0.52917721092;

/// Ry -> eV
pub const RYDBERG_TO_EV: f64 = 13.60569253;

/// eV -> cm⁻¹（仅用于显示）
pub const EV_TO_WAVENUMBER: f64 = 8065.54429;

/// 声子能量换算常数
///
/// 质量加权力常数矩阵的本征值单位为 eV/(Å²·amu)，
/// `E = phonon_energy_factor() * sqrt(λ)` 给出以 eV 为单位的声子能量。
pub fn phonon_energy_factor() -> f64 {
    HBAR * (1.0e20 * EV_TO_JOULE / AMU_TO_KG).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phonon_energy_factor_magnitude() {
        // ħ·sqrt(eV/(Å²·amu)) ≈ 64.65 meV
        let c = phonon_energy_factor();
        assert!((c - 6.46541e-2).abs() < 1e-6, "got {}", c);
    }
}
