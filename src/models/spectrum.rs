//! # 声子谱与电声耦合数据模型
//!
//! ## 依赖关系
//! - 被 `phonon/solver.rs`, `phonon/coupling.rs` 构建
//! - 被 `export/` 和 `commands/` 使用
//! - 使用 `nalgebra` 稠密矩阵

use nalgebra::DMatrix;

/// 声子谱（按本征值升序）
#[derive(Debug, Clone)]
pub struct PhononSpectrum {
    /// 质量加权力常数矩阵的本征值 (eV/Å²/amu)
    pub eigenvalues: Vec<f64>,

    /// 带符号能量 (eV)，不稳定模式为负
    pub signed_energies: Vec<f64>,

    /// 截断能量 (eV)，不稳定模式为 0，后续计算均使用该值
    pub energies: Vec<f64>,

    /// 本征向量，每一列为一个模式
    pub modes: DMatrix<f64>,

    /// 不稳定模式标记
    pub unstable: Vec<bool>,
}

impl PhononSpectrum {
    pub fn n_modes(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn unstable_count(&self) -> usize {
        self.unstable.iter().filter(|&&u| u).count()
    }

    /// 截断能量的降序列表（输出文件顺序）
    pub fn energies_descending(&self) -> Vec<f64> {
        self.energies.iter().rev().copied().collect()
    }
}

/// 电声耦合张量
///
/// 每个 (模式, 自旋) 对应一个 `n_orb × n_orb` 块，
/// 能量不为正的模式没有块。
#[derive(Debug, Clone)]
pub struct CouplingTensor {
    nspin: usize,
    blocks: Vec<Option<DMatrix<f64>>>,
}

impl CouplingTensor {
    /// 创建空张量（所有块缺失）
    pub fn new(n_modes: usize, nspin: usize) -> Self {
        CouplingTensor {
            nspin,
            blocks: vec![None; n_modes * nspin],
        }
    }

    pub fn set_block(&mut self, mode: usize, spin: usize, block: DMatrix<f64>) {
        self.blocks[mode * self.nspin + spin] = Some(block);
    }

    pub fn block(&self, mode: usize, spin: usize) -> Option<&DMatrix<f64>> {
        self.blocks
            .get(mode * self.nspin + spin)
            .and_then(|b| b.as_ref())
    }

    /// 已计算的块数
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    /// 模式 `mode` 在所有自旋上的最大耦合矩阵元绝对值
    pub fn max_abs(&self, mode: usize) -> Option<f64> {
        (0..self.nspin)
            .filter_map(|s| self.block(mode, s))
            .map(|b| b.amax())
            .reduce(f64::max)
    }
}
