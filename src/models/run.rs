//! # 计算运行上下文
//!
//! 运行描述 (`inputFC.in`) 的数据模型，以及由其构建的不可变 `RunContext`。
//! `RunContext` 在流程开始时构建一次，之后以引用传递给所有阶段。
//!
//! ## 依赖关系
//! - 被 `parsers/descriptor.rs` 构建
//! - 被 `phonon/`, `export/`, `commands/` 使用
//! - 使用 `models/system.rs`, `models/periodic_table.rs`

use super::periodic_table;
use super::system::{DynamicAtomSet, FermiLevelSet, OrbitalIndex};
use crate::error::{PhononError, Result};
use std::path::{Path, PathBuf};

/// 原子种类 (SIESTA `ChemicalSpeciesLabel` 的一行)
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: u32,
    pub atomic_number: u32,
    pub name: String,
}

/// 位移单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementUnit {
    Angstrom,
    Bohr,
}

impl DisplacementUnit {
    /// 解析单位字符串（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ang" | "angstrom" => Some(DisplacementUnit::Angstrom),
            "bohr" => Some(DisplacementUnit::Bohr),
            _ => None,
        }
    }

    /// 换算为 Å
    pub fn to_angstrom(self, value: f64) -> f64 {
        match self {
            DisplacementUnit::Angstrom => value,
            DisplacementUnit::Bohr => value * super::constants::BOHR_TO_ANG,
        }
    }
}

/// 运行描述（由描述文件解析得到）
#[derive(Debug, Clone)]
pub struct RunDescriptor {
    /// 体系标签（所有输入文件的前缀）
    pub label: String,

    /// 晶胞内原子总数
    pub n_atoms: usize,

    /// 原子种类表
    pub species: Vec<Species>,

    /// 自旋通道数
    pub nspin: usize,

    /// 第一个动力学原子（从 1 计数）
    pub first: usize,

    /// 最后一个动力学原子（从 1 计数）
    pub last: usize,

    /// 位移大小 (Å)
    pub displacement: f64,

    /// 每个动力学原子的种类编号
    pub dynamic_species: Vec<u32>,
}

impl RunDescriptor {
    pub fn species_by_id(&self, id: u32) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }
}

/// 动力学原子
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicAtom {
    /// 完整体系中的编号（从 1 计数）
    pub id: usize,
    pub atomic_number: u32,
    pub symbol: String,
    /// 原子质量 (amu)
    pub mass: f64,
}

/// 不可变运行上下文
#[derive(Debug, Clone)]
pub struct RunContext {
    label: String,
    fc_dir: PathBuf,
    output_dir: PathBuf,
    n_atoms: usize,
    nspin: usize,
    displacement: f64,
    dynamic: DynamicAtomSet,
    dynamic_atoms: Vec<DynamicAtom>,
}

impl RunContext {
    /// 从运行描述构建上下文，并通过周期表解析动力学原子质量
    pub fn new(descriptor: &RunDescriptor, fc_dir: &Path, output_dir: &Path) -> Result<Self> {
        let dynamic = DynamicAtomSet::new(descriptor.first, descriptor.last, descriptor.n_atoms)?;

        if descriptor.nspin == 0 {
            return Err(PhononError::InvalidArgument(
                "number of spin channels must be positive".to_string(),
            ));
        }
        if !(descriptor.displacement > 0.0) {
            return Err(PhononError::InvalidArgument(format!(
                "displacement must be positive, got {}",
                descriptor.displacement
            )));
        }
        if descriptor.dynamic_species.len() != dynamic.len() {
            return Err(PhononError::InvalidArgument(format!(
                "expected {} dynamic atom species, got {}",
                dynamic.len(),
                descriptor.dynamic_species.len()
            )));
        }

        let dynamic_atoms = descriptor
            .dynamic_species
            .iter()
            .zip(dynamic.atom_range())
            .map(|(&sp, atom)| {
                let species = descriptor.species_by_id(sp).ok_or_else(|| {
                    PhononError::InvalidArgument(format!(
                        "unknown species id {} for atom {}",
                        sp,
                        atom + 1
                    ))
                })?;
                let element =
                    periodic_table::by_atomic_number(species.atomic_number).ok_or_else(|| {
                        PhononError::InvalidArgument(format!(
                            "no mass for atomic number {} (species '{}')",
                            species.atomic_number, species.name
                        ))
                    })?;
                Ok(DynamicAtom {
                    id: atom + 1,
                    atomic_number: element.atomic_number,
                    symbol: element.symbol.to_string(),
                    mass: element.mass,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RunContext {
            label: descriptor.label.clone(),
            fc_dir: fc_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            n_atoms: descriptor.n_atoms,
            nspin: descriptor.nspin,
            displacement: descriptor.displacement,
            dynamic,
            dynamic_atoms,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // 维度
    // ─────────────────────────────────────────────────────────────

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn nspin(&self) -> usize {
        self.nspin
    }

    /// 位移大小 (Å)
    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn dynamic(&self) -> &DynamicAtomSet {
        &self.dynamic
    }

    pub fn dynamic_atoms(&self) -> &[DynamicAtom] {
        &self.dynamic_atoms
    }

    /// 自由度数 3·nDyn
    pub fn n_dof(&self) -> usize {
        self.dynamic.dof()
    }

    /// 自由度 `k` 所属原子的质量
    pub fn mass_of_dof(&self, k: usize) -> f64 {
        self.dynamic_atoms[k / 3].mass
    }

    // ─────────────────────────────────────────────────────────────
    // 文件路径
    // ─────────────────────────────────────────────────────────────

    pub fn fc_dir(&self) -> &Path {
        &self.fc_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn input(&self, suffix: &str) -> PathBuf {
        self.fc_dir.join(format!("{}{}", self.label, suffix))
    }

    fn output(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", self.label, suffix))
    }

    pub fn fc_path(&self) -> PathBuf {
        self.input(".FC")
    }

    pub fn fermi_path(&self) -> PathBuf {
        self.input(".ef")
    }

    pub fn orbital_path(&self) -> PathBuf {
        self.input(".orb")
    }

    pub fn xyz_path(&self) -> PathBuf {
        self.input(".xyz")
    }

    /// 第 `idx` 次计算的 Hamiltonian/重叠矩阵文件（编号补零到三位）
    pub fn ghs_path(&self, idx: usize) -> PathBuf {
        self.input(&format!("_{:03}.gHS", idx))
    }

    /// 第 `n` 个重叠矩阵位移文件（`n` = 1..=6，不补零）
    pub fn only_s_path(&self, n: usize) -> PathBuf {
        self.input(&format!("_{}.onlyS", n))
    }

    pub fn meph_path(&self) -> PathBuf {
        self.output(".Meph")
    }

    pub fn bmeph_path(&self) -> PathBuf {
        self.output(".bMeph")
    }

    /// 第 `n` 个振动模式的 Jmol 文件（`n` 从 1 计数）
    pub fn jmol_path(&self, n: usize) -> PathBuf {
        self.output(&format!("JMOL{}.xyz", n))
    }
}

/// 电子部分输入（仅 `full` 计算需要）
#[derive(Debug, Clone)]
pub struct ElectronicInputs {
    pub fermi: FermiLevelSet,
    pub orbitals: OrbitalIndex,
}

impl ElectronicInputs {
    /// 检查轨道表与上下文一致
    pub fn new(ctx: &RunContext, fermi: FermiLevelSet, orbitals: OrbitalIndex) -> Result<Self> {
        if orbitals.n_atoms() != ctx.n_atoms() {
            return Err(PhononError::DimensionMismatch {
                path: ctx.orbital_path().display().to_string(),
                what: "number of atoms".to_string(),
                expected: ctx.n_atoms(),
                found: orbitals.n_atoms(),
            });
        }
        if fermi.len() != 2 * ctx.n_dof() + 1 {
            return Err(PhononError::DimensionMismatch {
                path: ctx.fermi_path().display().to_string(),
                what: "number of Fermi levels".to_string(),
                expected: 2 * ctx.n_dof() + 1,
                found: fermi.len(),
            });
        }
        Ok(ElectronicInputs { fermi, orbitals })
    }

    /// 第一个动力学轨道 f（0 起始）
    pub fn first_orbital(&self, ctx: &RunContext) -> usize {
        self.orbitals.dynamic_orbitals(ctx.dynamic()).start
    }

    /// 动力学轨道数 nOrb
    pub fn n_orb(&self, ctx: &RunContext) -> usize {
        self.orbitals.dynamic_orbitals(ctx.dynamic()).len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 测试用描述：3 个原子，第 2 个为动力学原子 (C)
    pub(crate) fn sample_descriptor() -> RunDescriptor {
        RunDescriptor {
            label: "mol".to_string(),
            n_atoms: 3,
            species: vec![
                Species {
                    id: 1,
                    atomic_number: 79,
                    name: "Au".to_string(),
                },
                Species {
                    id: 2,
                    atomic_number: 6,
                    name: "C".to_string(),
                },
            ],
            nspin: 1,
            first: 2,
            last: 2,
            displacement: 0.04,
            dynamic_species: vec![2],
        }
    }

    #[test]
    fn test_displacement_unit() {
        assert_eq!(DisplacementUnit::parse("BOHR"), Some(DisplacementUnit::Bohr));
        assert_eq!(DisplacementUnit::parse("Ang"), Some(DisplacementUnit::Angstrom));
        assert_eq!(DisplacementUnit::parse("nm"), None);
        let d = DisplacementUnit::Bohr.to_angstrom(1.0);
        assert!((d - 0.52917721092).abs() < 1e-12);
    }

    #[test]
    fn test_run_context_paths() {
        let ctx = RunContext::new(&sample_descriptor(), Path::new("fc"), Path::new("out")).unwrap();
        assert_eq!(ctx.ghs_path(7), Path::new("fc/mol_007.gHS"));
        assert_eq!(ctx.only_s_path(3), Path::new("fc/mol_3.onlyS"));
        assert_eq!(ctx.fc_path(), Path::new("fc/mol.FC"));
        assert_eq!(ctx.meph_path(), Path::new("out/mol.Meph"));
        assert_eq!(ctx.jmol_path(2), Path::new("out/molJMOL2.xyz"));
    }

    #[test]
    fn test_run_context_masses() {
        let ctx = RunContext::new(&sample_descriptor(), Path::new("."), Path::new(".")).unwrap();
        assert_eq!(ctx.n_dof(), 3);
        assert_eq!(ctx.dynamic_atoms()[0].id, 2);
        assert_eq!(ctx.dynamic_atoms()[0].symbol, "C");
        assert!((ctx.mass_of_dof(2) - 12.01).abs() < 1e-12);
    }

    #[test]
    fn test_run_context_unknown_species() {
        let mut d = sample_descriptor();
        d.dynamic_species = vec![9];
        assert!(RunContext::new(&d, Path::new("."), Path::new(".")).is_err());
    }
}
