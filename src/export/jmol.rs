//! # Jmol 振动动画输出
//!
//! 每个声子模式（按本征值升序，从 1 编号）写一个 `<label>JMOL<n>.xyz`：
//! 非动力学原子只有坐标，动力学原子在坐标后附上该模式的三个分量。
//!
//! ## 依赖关系
//! - 被 `commands/phonons.rs` 使用
//! - 使用 `models/system.rs`, `models/spectrum.rs`

use super::c_exp_signed;
use crate::error::{PhononError, Result};
use crate::models::{AtomicSystem, PhononSpectrum, RunContext};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// 把模式 `mode` 写成 xyz 文本
pub fn write_mode<W: Write>(
    w: &mut W,
    ctx: &RunContext,
    system: &AtomicSystem,
    spectrum: &PhononSpectrum,
    mode: usize,
) -> std::io::Result<()> {
    write!(w, "   {}\n\n", system.len())?;

    let dynamic = ctx.dynamic().atom_range();
    for (k, atom) in system.atoms.iter().enumerate() {
        let [x, y, z] = atom.position;
        write!(
            w,
            "{}\t{}\t{}\t{}",
            atom.element,
            c_exp_signed(x, 6),
            c_exp_signed(y, 6),
            c_exp_signed(z, 6)
        )?;
        if dynamic.contains(&k) {
            let row = 3 * (k - dynamic.start);
            for axis in 0..3 {
                write!(w, "\t{}", c_exp_signed(spectrum.modes[(row + axis, mode)], 6))?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// 为所有模式写出 Jmol 文件，返回写出的路径
pub fn write_all(
    ctx: &RunContext,
    system: &AtomicSystem,
    spectrum: &PhononSpectrum,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(spectrum.n_modes());
    for mode in 0..spectrum.n_modes() {
        let path = ctx.jmol_path(mode + 1);
        let file = File::create(&path).map_err(|e| PhononError::write(&path, e))?;
        let mut w = BufWriter::new(file);
        write_mode(&mut w, ctx, system, spectrum, mode)
            .and_then(|_| w.flush())
            .map_err(|e| PhononError::write(&path, e))?;
        written.push(path);
    }
    Ok(written)
}
