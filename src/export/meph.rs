//! # 电声耦合矩阵输出
//!
//! - `<label>.Meph`：文本格式
//! - `<label>.bMeph`：小端二进制格式
//!
//! 两种格式的内容相同：文件头 `nspin nDyn nOrb first last`（轨道编号从 1 计数），
//! 按降序排列的 `3·nDyn` 个声子能量，以及能量为正的每个 (模式, 自旋) 的耦合块
//! （模式按能量降序，自旋在内层）。二进制块为列主序。
//!
//! ## 依赖关系
//! - 被 `commands/full.rs`, `commands/show.rs` 使用
//! - 使用 `models/spectrum.rs`

use super::{c_exp, c_exp_signed};
use crate::error::{PhononError, Result};
use crate::models::{CouplingTensor, ElectronicInputs, PhononSpectrum, RunContext};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MephHeader {
    pub nspin: usize,
    pub n_dyn: usize,
    pub n_orb: usize,
    /// 第一个动力学轨道（从 1 计数）
    pub first_orbital: usize,
    /// 最后一个动力学轨道（从 1 计数）
    pub last_orbital: usize,
}

impl MephHeader {
    pub fn n_modes(&self) -> usize {
        3 * self.n_dyn
    }
}

/// 耦合矩阵文件内容
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingFile {
    pub header: MephHeader,
    /// 声子能量 (eV)，降序
    pub energies: Vec<f64>,
    /// 耦合块，按写入顺序
    pub blocks: Vec<DMatrix<f64>>,
}

impl CouplingFile {
    pub fn new(
        ctx: &RunContext,
        inputs: &ElectronicInputs,
        spectrum: &PhononSpectrum,
        tensor: &CouplingTensor,
    ) -> Self {
        let f = inputs.first_orbital(ctx);
        let n_orb = inputs.n_orb(ctx);
        let header = MephHeader {
            nspin: ctx.nspin(),
            n_dyn: ctx.dynamic().len(),
            n_orb,
            first_orbital: f + 1,
            last_orbital: f + n_orb,
        };

        let blocks = (0..spectrum.n_modes())
            .rev()
            .filter(|&l| spectrum.energies[l] > 0.0)
            .flat_map(|l| (0..ctx.nspin()).filter_map(move |s| tensor.block(l, s).cloned()))
            .collect();

        CouplingFile {
            header,
            energies: spectrum.energies_descending(),
            blocks,
        }
    }

    /// 能量为正的模式数
    pub fn positive_modes(&self) -> usize {
        self.energies.iter().filter(|&&e| e > 0.0).count()
    }

    // ─────────────────────────────────────────────────────────────
    // 文本格式
    // ─────────────────────────────────────────────────────────────

    pub fn write_text_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        let h = &self.header;
        write!(
            w,
            "{}  {}  {}  {}  {}\n\n",
            h.nspin, h.n_dyn, h.n_orb, h.first_orbital, h.last_orbital
        )?;

        for &e in &self.energies {
            write!(w, "{}  ", c_exp(e, 10))?;
        }
        write!(w, "\n\n")?;

        for block in &self.blocks {
            for i in 0..block.nrows() {
                for j in 0..block.ncols() {
                    write!(w, " {}", c_exp_signed(block[(i, j)], 15))?;
                }
                writeln!(w)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn write_text(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| PhononError::write(path, e))?;
        let mut w = BufWriter::new(file);
        self.write_text_to(&mut w)
            .and_then(|_| w.flush())
            .map_err(|e| PhononError::write(path, e))
    }

    // ─────────────────────────────────────────────────────────────
    // 二进制格式
    // ─────────────────────────────────────────────────────────────

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let h = &self.header;
        let mut bytes = Vec::new();
        for v in [h.nspin, h.n_dyn, h.n_orb, h.first_orbital, h.last_orbital] {
            let v = i32::try_from(v).map_err(|_| {
                PhononError::InvalidArgument(format!("header value {} does not fit in i32", v))
            })?;
            push_i32(&mut bytes, v);
        }
        for &e in &self.energies {
            push_f64(&mut bytes, e);
        }
        for block in &self.blocks {
            // DMatrix 的存储即为列主序
            for &v in block.iter() {
                push_f64(&mut bytes, v);
            }
        }
        Ok(bytes)
    }

    pub fn write_binary(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| PhononError::write(path, e))
    }

    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let truncated = |what: &str, expected: usize, found: usize| PhononError::TruncatedStream {
            path: path.display().to_string(),
            what: what.to_string(),
            expected,
            found,
        };
        let mut offset = 0;

        let mut fields = [0usize; 5];
        for (i, field) in fields.iter_mut().enumerate() {
            let v = take_i32(bytes, &mut offset).ok_or_else(|| truncated("header", 5, i))?;
            *field = usize::try_from(v).map_err(|_| PhononError::ParseError {
                format: "bMeph".to_string(),
                path: path.display().to_string(),
                reason: format!("negative header value {}", v),
            })?;
        }
        let header = MephHeader {
            nspin: fields[0],
            n_dyn: fields[1],
            n_orb: fields[2],
            first_orbital: fields[3],
            last_orbital: fields[4],
        };

        // 分配之前按剩余字节数检查文件头给出的尺寸
        let n_modes = header.n_dyn.checked_mul(3).unwrap_or(usize::MAX);
        let remaining = bytes.len() - offset;
        if !fits(n_modes, F64_BYTES, remaining) {
            return Err(truncated("energies", n_modes, remaining / F64_BYTES));
        }
        let mut energies = Vec::with_capacity(n_modes);
        for i in 0..n_modes {
            let e = take_f64(bytes, &mut offset).ok_or_else(|| truncated("energies", n_modes, i))?;
            energies.push(e);
        }

        let positive = energies.iter().filter(|&&e| e > 0.0).count();
        let n_blocks = positive.checked_mul(header.nspin).unwrap_or(usize::MAX);
        let block_bytes = header
            .n_orb
            .checked_mul(header.n_orb)
            .and_then(|n| n.checked_mul(F64_BYTES));
        let remaining = bytes.len() - offset;
        let complete = match block_bytes {
            Some(b) => fits(n_blocks, b, remaining),
            None => n_blocks == 0,
        };
        if !complete {
            let found = match block_bytes {
                Some(b) if b > 0 => remaining / b,
                _ => 0,
            };
            return Err(truncated("coupling blocks", n_blocks, found));
        }

        let per_block = block_bytes.map_or(0, |b| b / F64_BYTES);
        let mut blocks = Vec::with_capacity(n_blocks);
        for b in 0..n_blocks {
            let mut values = Vec::with_capacity(per_block);
            for _ in 0..per_block {
                let v = take_f64(bytes, &mut offset)
                    .ok_or_else(|| truncated("coupling blocks", n_blocks, b))?;
                values.push(v);
            }
            blocks.push(DMatrix::from_vec(header.n_orb, header.n_orb, values));
        }

        Ok(CouplingFile {
            header,
            energies,
            blocks,
        })
    }

    pub fn read_binary(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PhononError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let bytes = std::fs::read(path).map_err(|e| PhononError::read(path, e))?;
        Self::from_bytes(&bytes, path)
    }
}

const F64_BYTES: usize = std::mem::size_of::<f64>();

/// `count` 个 `width` 字节的元素能否放进 `available` 字节
fn fits(count: usize, width: usize, available: usize) -> bool {
    matches!(count.checked_mul(width), Some(total) if total <= available)
}

fn take_i32(bytes: &[u8], offset: &mut usize) -> Option<i32> {
    let end = offset.checked_add(std::mem::size_of::<i32>())?;
    let slice = bytes.get(*offset..end)?;
    let value = i32::from_le_bytes(slice.try_into().ok()?);
    *offset = end;
    Some(value)
}

fn take_f64(bytes: &[u8], offset: &mut usize) -> Option<f64> {
    let end = offset.checked_add(std::mem::size_of::<f64>())?;
    let slice = bytes.get(*offset..end)?;
    let value = f64::from_le_bytes(slice.try_into().ok()?);
    *offset = end;
    Some(value)
}

fn push_i32(target: &mut Vec<u8>, value: i32) {
    target.extend_from_slice(&value.to_le_bytes());
}

fn push_f64(target: &mut Vec<u8>, value: f64) {
    target.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonon::fixtures::SyntheticRun;

    fn sample() -> CouplingFile {
        CouplingFile {
            header: MephHeader {
                nspin: 2,
                n_dyn: 1,
                n_orb: 2,
                first_orbital: 5,
                last_orbital: 6,
            },
            energies: vec![0.2, 0.1, 0.0],
            blocks: (0..4)
                .map(|b| DMatrix::from_fn(2, 2, |i, j| b as f64 + 0.1 * i as f64 - 0.37 * j as f64))
                .collect(),
        }
    }

    #[test]
    fn test_blocks_are_mode_descending_spin_inner() {
        let run = SyntheticRun::write_two_atoms();
        let (ctx, inputs) = run.context();
        let spectrum = PhononSpectrum {
            eigenvalues: vec![-1.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            signed_energies: vec![-0.01, 0.01, 0.02, 0.03, 0.04, 0.05],
            energies: vec![0.0, 0.01, 0.02, 0.03, 0.04, 0.05],
            modes: DMatrix::identity(6, 6),
            unstable: vec![true, false, false, false, false, false],
        };
        let mut tensor = CouplingTensor::new(6, 2);
        for l in 1..6 {
            for s in 0..2 {
                tensor.set_block(l, s, DMatrix::from_element(4, 4, (10 * l + s) as f64));
            }
        }

        let file = CouplingFile::new(&ctx, &inputs, &spectrum, &tensor);
        assert_eq!(
            file.header,
            MephHeader {
                nspin: 2,
                n_dyn: 2,
                n_orb: 4,
                first_orbital: 2,
                last_orbital: 5,
            }
        );
        assert_eq!(file.energies, vec![0.05, 0.04, 0.03, 0.02, 0.01, 0.0]);

        let tags: Vec<f64> = file.blocks.iter().map(|b| b[(0, 0)]).collect();
        assert_eq!(tags, vec![50.0, 51.0, 40.0, 41.0, 30.0, 31.0, 20.0, 21.0, 10.0, 11.0]);

        let decoded = CouplingFile::from_bytes(&file.to_bytes().unwrap(), Path::new("x.bMeph")).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_text_layout() {
        let mut out = Vec::new();
        sample().write_text_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], "2  1  2  5  6");
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "2.0000000000e-01  1.0000000000e-01  0.0000000000e+00  "
        );
        assert_eq!(lines[3], "");
        assert_eq!(
            lines[4],
            "  0.000000000000000e+00 -3.700000000000000e-01"
        );
        // 4 个块，每块 2 行 + 1 空行
        assert_eq!(lines[6], "");
        assert_eq!(lines.len(), 4 + 4 * 3 + 1);
    }

    #[test]
    fn test_binary_round_trip() {
        let original = sample();
        let bytes = original.to_bytes().unwrap();
        assert_eq!(bytes.len(), 5 * 4 + 3 * 8 + 4 * 4 * 8);

        let decoded = CouplingFile::from_bytes(&bytes, Path::new("x.bMeph")).unwrap();
        assert_eq!(decoded.header, original.header);
        for (a, b) in decoded.energies.iter().zip(&original.energies) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in decoded.blocks.iter().zip(&original.blocks) {
            assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
        }
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_binary_blocks_are_column_major() {
        let bytes = sample().to_bytes().unwrap();
        let offset = 5 * 4 + 3 * 8 + 8;
        let second = f64::from_le_bytes(bytes[offset..offset + 8].try_into().unwrap());
        // 第一个块的 (1, 0) 元素
        assert!((second - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_truncated_binary() {
        let bytes = sample().to_bytes().unwrap();
        let e = CouplingFile::from_bytes(&bytes[..bytes.len() - 4], Path::new("x.bMeph")).unwrap_err();
        assert!(matches!(e, PhononError::TruncatedStream { .. }));
    }

    fn header_bytes(fields: [i32; 5]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for v in fields {
            push_i32(&mut bytes, v);
        }
        bytes
    }

    #[test]
    fn test_oversized_orbital_count_is_truncation() {
        let mut bytes = header_bytes([1, 1, i32::MAX, 1, i32::MAX]);
        for e in [0.3, 0.2, 0.1] {
            push_f64(&mut bytes, e);
        }
        let e = CouplingFile::from_bytes(&bytes, Path::new("x.bMeph")).unwrap_err();
        match e {
            PhononError::TruncatedStream { ref what, expected, found, .. } => {
                assert_eq!(what, "coupling blocks");
                assert_eq!(expected, 3);
                assert_eq!(found, 0);
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(e.class(), crate::error::ErrorClass::Structural);
    }

    #[test]
    fn test_oversized_mode_count_is_truncation() {
        let mut bytes = header_bytes([2, i32::MAX, 4, 1, 4]);
        push_f64(&mut bytes, 0.1);
        let e = CouplingFile::from_bytes(&bytes, Path::new("x.bMeph")).unwrap_err();
        assert!(matches!(
            e,
            PhononError::TruncatedStream { ref what, found: 1, .. } if what == "energies"
        ));
    }

    #[test]
    fn test_empty_blocks_need_no_payload() {
        // 没有正能量模式时文件在能量之后结束
        let mut bytes = header_bytes([1, 1, i32::MAX, 1, i32::MAX]);
        for e in [0.0, 0.0, 0.0] {
            push_f64(&mut bytes, e);
        }
        let file = CouplingFile::from_bytes(&bytes, Path::new("x.bMeph")).unwrap();
        assert!(file.blocks.is_empty());
        assert_eq!(file.positive_modes(), 0);
    }

    #[test]
    fn test_write_and_read_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bMeph");
        let original = sample();
        original.write_binary(&path).unwrap();
        assert_eq!(CouplingFile::read_binary(&path).unwrap(), original);

        let text = dir.path().join("x.Meph");
        original.write_text(&text).unwrap();
        assert!(std::fs::read_to_string(&text).unwrap().starts_with("2  1  2  5  6\n\n"));
    }
}
