//! # 运行描述解析器
//!
//! 解析 `inputFC.in`：由 FC 计算的 fdf 输入整理得到的空白分隔词法单元。
//!
//! ## 格式
//! ```text
//! label
//! n_atoms
//! n_species
//! id Z name        (n_species 行)
//! nspin
//! first last
//! displacement unit   (unit = ang | bohr)
//! species_id ...      (每个动力学原子一个)
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/run.rs`

use super::{read_text, Tokens};
use crate::error::Result;
use crate::models::{DisplacementUnit, RunDescriptor, Species};
use std::path::{Path, PathBuf};

/// 运行描述来源
pub trait DescriptorSource {
    fn load(&self) -> Result<RunDescriptor>;
}

/// 从文件读取运行描述
#[derive(Debug, Clone)]
pub struct DescriptorFile {
    path: PathBuf,
}

impl DescriptorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DescriptorFile { path: path.into() }
    }
}

impl DescriptorSource for DescriptorFile {
    fn load(&self) -> Result<RunDescriptor> {
        let content = read_text(&self.path)?;
        parse_descriptor(&content, &self.path)
    }
}

/// 解析描述文件内容
pub fn parse_descriptor(content: &str, path: &Path) -> Result<RunDescriptor> {
    let mut t = Tokens::new(content, "descriptor", path);

    let label = t.next_str("system label")?.to_string();
    let n_atoms: usize = t.next("number of atoms")?;
    let n_species: usize = t.next("number of species")?;

    let mut species = Vec::with_capacity(n_species);
    for _ in 0..n_species {
        let id: u32 = t.next("species id")?;
        let atomic_number: u32 = t.next("atomic number")?;
        let name = t.next_str("species name")?.to_string();
        species.push(Species {
            id,
            atomic_number,
            name,
        });
    }

    let nspin: usize = t.next("spin polarization")?;
    let first: usize = t.next("first dynamic atom")?;
    let last: usize = t.next("last dynamic atom")?;

    let value: f64 = t.next("displacement")?;
    let unit_str = t.next_str("displacement unit")?;
    let unit = DisplacementUnit::parse(unit_str).ok_or_else(|| {
        t.error(format!(
            "unrecognized displacement unit '{}', it must be 'Ang' or 'Bohr'",
            unit_str
        ))
    })?;

    if last < first {
        return Err(t.error(format!(
            "last dynamic atom {} is before first dynamic atom {}",
            last, first
        )));
    }
    let n_dyn = last - first + 1;
    let mut dynamic_species = Vec::with_capacity(n_dyn);
    for _ in 0..n_dyn {
        dynamic_species.push(t.next::<u32>("dynamic atom species")?);
    }

    Ok(RunDescriptor {
        label,
        n_atoms,
        species,
        nspin,
        first,
        last,
        displacement: unit.to_angstrom(value),
        dynamic_species,
    })
}
