//! # SIESTA xyz 结构文件解析器
//!
//! 原子数，随后每个原子一组 `symbol x y z` (Å)。
//!
//! ## 依赖关系
//! - 被 `commands/phonons.rs` 使用（Jmol 输出）
//! - 使用 `models/system.rs`

use super::{read_text, Tokens};
use crate::error::{PhononError, Result};
use crate::models::{Atom, AtomicSystem};
use std::path::Path;

/// 读取 xyz 文件并检查原子数
pub fn read_xyz(path: &Path, n_atoms: usize) -> Result<AtomicSystem> {
    let content = read_text(path)?;
    parse_xyz(&content, path, n_atoms)
}

pub fn parse_xyz(content: &str, path: &Path, n_atoms: usize) -> Result<AtomicSystem> {
    let mut t = Tokens::new(content, "xyz", path);

    let count: usize = t.next("number of atoms")?;
    if count != n_atoms {
        return Err(PhononError::DimensionMismatch {
            path: path.display().to_string(),
            what: "number of atoms".to_string(),
            expected: n_atoms,
            found: count,
        });
    }

    let mut atoms = Vec::with_capacity(n_atoms);
    for _ in 0..n_atoms {
        let element = t.next_str("atomic symbol")?.to_string();
        let position = [
            t.next::<f64>("x coordinate")?,
            t.next::<f64>("y coordinate")?,
            t.next::<f64>("z coordinate")?,
        ];
        atoms.push(Atom { element, position });
    }

    Ok(AtomicSystem::new(atoms))
}
