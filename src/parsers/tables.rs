//! # 费米能表与轨道索引表
//!
//! - `<label>.ef`: 每行 `index energy`，共 `6·nDyn + 1` 行，index 列忽略
//! - `<label>.orb`: `n_atoms + 1` 个整数，每个原子的第一个轨道索引
//!
//! ## 依赖关系
//! - 被 `commands/full.rs` 使用
//! - 使用 `models/system.rs`

use super::{read_text, Tokens};
use crate::error::Result;
use crate::models::{FermiLevelSet, OrbitalIndex};
use std::path::Path;

/// 读取费米能表
pub fn read_fermi_levels(path: &Path, n_dof: usize) -> Result<FermiLevelSet> {
    let content = read_text(path)?;
    parse_fermi_levels(&content, path, n_dof)
}

pub fn parse_fermi_levels(content: &str, path: &Path, n_dof: usize) -> Result<FermiLevelSet> {
    let mut t = Tokens::new(content, "Fermi energy", path);
    let n = 2 * n_dof + 1;
    let mut levels = Vec::with_capacity(n);
    for _ in 0..n {
        t.next_str("run index")?;
        levels.push(t.next::<f64>("Fermi energy")?);
    }
    FermiLevelSet::new(levels, n_dof)
}

/// 读取轨道索引表
pub fn read_orbital_index(path: &Path, n_atoms: usize) -> Result<OrbitalIndex> {
    let content = read_text(path)?;
    parse_orbital_index(&content, path, n_atoms)
}

pub fn parse_orbital_index(content: &str, path: &Path, n_atoms: usize) -> Result<OrbitalIndex> {
    let mut t = Tokens::new(content, "orbital index", path);
    let first = (0..=n_atoms)
        .map(|_| t.next::<usize>("first orbital index"))
        .collect::<Result<Vec<_>>>()?;
    OrbitalIndex::new(first).map_err(|e| t.error(e.to_string()))
}
