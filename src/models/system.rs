//! # 原子体系与索引数据模型
//!
//! 定义原子体系、动力学原子范围、轨道索引表与费米能表。
//! 这些对象在流程开始时加载一次，之后只读。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `phonon/`, `export/` 使用
//! - 无外部模块依赖

use crate::error::{PhononError, Result};
use std::ops::Range;

/// 原子信息
#[derive(Debug, Clone)]
pub struct Atom {
    /// 元素符号（原样保留文件中的标签）
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

/// 原子体系（完整结构，包括非动力学原子）
#[derive(Debug, Clone)]
pub struct AtomicSystem {
    pub atoms: Vec<Atom>,
}

impl AtomicSystem {
    pub fn new(atoms: Vec<Atom>) -> Self {
        AtomicSystem { atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }
}

/// 动力学原子范围 `[first, last]`（从 1 开始计数，闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicAtomSet {
    first: usize,
    last: usize,
}

impl DynamicAtomSet {
    /// 创建并检查范围是否落在 `1..=n_atoms` 内
    pub fn new(first: usize, last: usize, n_atoms: usize) -> Result<Self> {
        if first < 1 || last < first || last > n_atoms {
            return Err(PhononError::InvalidArgument(format!(
                "dynamic atoms range [{}, {}] is outside 1..={}",
                first, last, n_atoms
            )));
        }
        Ok(DynamicAtomSet { first, last })
    }

    /// 第一个动力学原子（从 1 计数）
    pub fn first(&self) -> usize {
        self.first
    }

    /// 最后一个动力学原子（从 1 计数）
    pub fn last(&self) -> usize {
        self.last
    }

    /// 动力学原子数 nDyn
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// 自由度数 3·nDyn
    pub fn dof(&self) -> usize {
        3 * self.len()
    }

    /// 动力学原子的 0 起始索引范围
    pub fn atom_range(&self) -> Range<usize> {
        (self.first - 1)..self.last
    }

    /// 完整力常数矩阵中属于动力学原子的行范围
    pub fn coordinate_range(&self) -> Range<usize> {
        3 * (self.first - 1)..3 * self.last
    }

    /// 自由度 `k` 对应的原子（0 起始，完整体系索引）
    pub fn atom_of_dof(&self, k: usize) -> usize {
        self.first - 1 + k / 3
    }
}

/// 每个原子的第一个轨道索引（0 起始）
///
/// 共 `n_atoms + 1` 项，严格递增，最后一项为晶胞内基函数总数 `no_u`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitalIndex {
    first: Vec<usize>,
}

impl OrbitalIndex {
    pub fn new(first: Vec<usize>) -> Result<Self> {
        if first.len() < 2 {
            return Err(PhononError::InvalidArgument(
                "orbital index table needs at least two entries".to_string(),
            ));
        }
        if let Some(w) = first.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PhononError::InvalidArgument(format!(
                "orbital index table is not strictly increasing ({} -> {})",
                w[0], w[1]
            )));
        }
        Ok(OrbitalIndex { first })
    }

    /// 原子数
    pub fn n_atoms(&self) -> usize {
        self.first.len() - 1
    }

    /// 晶胞内基函数总数
    pub fn no_u(&self) -> usize {
        self.first[self.first.len() - 1]
    }

    /// 原子 `atom`（0 起始）的轨道范围
    pub fn orbitals(&self, atom: usize) -> Range<usize> {
        self.first[atom]..self.first[atom + 1]
    }

    /// 动力学原子集合拥有的轨道范围
    pub fn dynamic_orbitals(&self, dynamic: &DynamicAtomSet) -> Range<usize> {
        self.first[dynamic.first() - 1]..self.first[dynamic.last()]
    }
}

/// 各次计算的费米能 (eV)
///
/// 索引 0 为未位移体系，`2k+1` / `2k+2` 为自由度 `k` 的负 / 正位移。
#[derive(Debug, Clone, PartialEq)]
pub struct FermiLevelSet {
    levels: Vec<f64>,
}

impl FermiLevelSet {
    pub fn new(levels: Vec<f64>, n_dof: usize) -> Result<Self> {
        let expected = 2 * n_dof + 1;
        if levels.len() != expected {
            return Err(PhononError::InvalidArgument(format!(
                "expected {} Fermi levels, got {}",
                expected,
                levels.len()
            )));
        }
        Ok(FermiLevelSet { levels })
    }

    pub fn undisplaced(&self) -> f64 {
        self.levels[0]
    }

    pub fn negative(&self, k: usize) -> f64 {
        self.levels[2 * k + 1]
    }

    pub fn positive(&self, k: usize) -> f64 {
        self.levels[2 * k + 2]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}
