//! # 稀疏矩阵二进制文件读取器
//!
//! 读取 SIESTA 输出的按行压缩稀疏矩阵（小端 `i32` 整数与 `f64` 数值）。
//!
//! ## 文件格式
//! ```text
//! .gHS:   no_u nspin nnz | numh[no_u] | listh[nnz] | H[nspin][nnz] (Ry) | S[nnz]
//! .onlyS: 2no_u nnz      | numh[2no_u] | listh[nnz] | S[nnz]
//! ```
//! 列索引从 1 开始，可能超出晶胞（超胞中的周期像）。
//!
//! 文件头、行计数、列索引与 Hamiltonian 数值块读取不完整时为结构错误；
//! 最后的重叠矩阵数值块读取不完整时仅记录 `Anomaly`，缺失值为 0。
//!
//! ## 依赖关系
//! - 被 `phonon/assembler.rs` 使用
//! - 无外部 crate 依赖

use crate::error::{PhononError, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// 按行压缩的稀疏矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    /// 每行非零元个数
    pub counts: Vec<usize>,

    /// 所有行拼接的列索引（从 1 开始）
    pub columns: Vec<usize>,

    /// Hamiltonian 数值平面，每个自旋一个 (Ry)；`.onlyS` 为空
    pub hamiltonian: Vec<Vec<f64>>,

    /// 重叠矩阵数值平面
    pub overlap: Vec<f64>,
}

impl SparseMatrix {
    /// 遍历非零元：`(行, 原始列索引, 数值下标)`
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .flat_map(|(row, &n)| std::iter::repeat(row).take(n))
            .zip(self.columns.iter())
            .enumerate()
            .map(|(k, (row, &col))| (row, col, k))
    }
}

/// 良性读取异常（最后一个数值块不完整）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub path: String,
    pub block: String,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "short read of {} in {}: got {} of {} values, the rest are taken as zero",
            self.block, self.path, self.found, self.expected
        )
    }
}

// ─────────────────────────────────────────────────────────────
// 二进制流
// ─────────────────────────────────────────────────────────────

struct BinaryStream<'a, R: Read> {
    reader: R,
    path: &'a Path,
}

impl<'a, R: Read> BinaryStream<'a, R> {
    fn new(reader: R, path: &'a Path) -> Self {
        BinaryStream { reader, path }
    }

    /// 尽量填满缓冲区，返回实际读取的字节数
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PhononError::read(self.path, e)),
            }
        }
        Ok(filled)
    }

    fn truncated(&self, what: &str, expected: usize, found: usize) -> PhononError {
        PhononError::TruncatedStream {
            path: self.path.display().to_string(),
            what: what.to_string(),
            expected,
            found,
        }
    }

    fn malformed(&self, reason: String) -> PhononError {
        PhononError::ParseError {
            format: "sparse matrix".to_string(),
            path: self.path.display().to_string(),
            reason,
        }
    }

    /// 按文件头给出的元素数分配读缓冲区
    fn buffer(&self, n: usize, width: usize, what: &str) -> Result<Vec<u8>> {
        let failed = || PhononError::AllocationFailed {
            what: what.to_string(),
            elements: n,
        };
        let len = n.checked_mul(width).ok_or_else(failed)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| failed())?;
        buf.resize(len, 0u8);
        Ok(buf)
    }

    fn read_i32s(&mut self, n: usize, what: &str) -> Result<Vec<i32>> {
        let mut buf = self.buffer(n, 4, what)?;
        let got = self.fill(&mut buf)?;
        if got < buf.len() {
            return Err(self.truncated(what, n, got / 4));
        }
        Ok(buf
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// 读取非负整数序列
    fn read_counts(&mut self, n: usize, what: &str) -> Result<Vec<usize>> {
        self.read_i32s(n, what)?
            .into_iter()
            .map(|v| {
                usize::try_from(v).map_err(|_| self.malformed(format!("negative {} ({})", what, v)))
            })
            .collect()
    }

    /// 读取 `n` 个 f64，返回 (数值, 完整读取的个数)；缺失部分为 0
    fn read_f64s_lenient(&mut self, n: usize, what: &str) -> Result<(Vec<f64>, usize)> {
        let mut buf = self.buffer(n, 8, what)?;
        let got = self.fill(&mut buf)?;
        let found = got / 8;
        let mut values: Vec<f64> = buf
            .chunks_exact(8)
            .take(found)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect();
        values.resize(n, 0.0);
        Ok((values, found))
    }

    fn read_f64s(&mut self, n: usize, what: &str) -> Result<Vec<f64>> {
        let (values, found) = self.read_f64s_lenient(n, what)?;
        if found < n {
            return Err(self.truncated(what, n, found));
        }
        Ok(values)
    }

    fn check_dimension(&self, what: &str, expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(PhononError::DimensionMismatch {
                path: self.path.display().to_string(),
                what: what.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// 行计数与列索引（两种格式共用）
    fn read_pattern(&mut self, n_rows: usize, nnz: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        let counts = self.read_counts(n_rows, "row counts")?;
        let total: usize = counts.iter().sum();
        self.check_dimension("sum of row counts", nnz, total)?;

        let columns = self.read_counts(nnz, "column indices")?;
        if let Some(&c) = columns.iter().find(|&&c| c == 0) {
            return Err(self.malformed(format!("column index {} is not 1-based", c)));
        }
        Ok((counts, columns))
    }

    /// 最后的重叠矩阵数值块，允许不完整
    fn read_final_overlap(&mut self, nnz: usize) -> Result<(Vec<f64>, Option<Anomaly>)> {
        let (values, found) = self.read_f64s_lenient(nnz, "overlap values")?;
        let anomaly = (found < nnz).then(|| Anomaly {
            path: self.path.display().to_string(),
            block: "overlap values".to_string(),
            expected: nnz,
            found,
        });
        Ok((values, anomaly))
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(PhononError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| PhononError::read(path, e))
}

// ─────────────────────────────────────────────────────────────
// .gHS
// ─────────────────────────────────────────────────────────────

/// 读取 `.gHS` 文件
pub fn read_ghs(path: &Path, no_u: usize, nspin: usize) -> Result<(SparseMatrix, Option<Anomaly>)> {
    decode_ghs(open(path)?, path, no_u, nspin)
}

pub fn decode_ghs<R: Read>(
    reader: R,
    path: &Path,
    no_u: usize,
    nspin: usize,
) -> Result<(SparseMatrix, Option<Anomaly>)> {
    let mut stream = BinaryStream::new(reader, path);

    let header = stream.read_counts(3, "header")?;
    stream.check_dimension("no_u", no_u, header[0])?;
    stream.check_dimension("nspin", nspin, header[1])?;
    let nnz = header[2];

    let (counts, columns) = stream.read_pattern(no_u, nnz)?;

    let hamiltonian = (0..nspin)
        .map(|s| stream.read_f64s(nnz, &format!("Hamiltonian values (spin {})", s + 1)))
        .collect::<Result<Vec<_>>>()?;

    let (overlap, anomaly) = stream.read_final_overlap(nnz)?;

    Ok((
        SparseMatrix {
            counts,
            columns,
            hamiltonian,
            overlap,
        },
        anomaly,
    ))
}

// ─────────────────────────────────────────────────────────────
// .onlyS
// ─────────────────────────────────────────────────────────────

/// 读取 `.onlyS` 文件（基组大小为 `2·no_u`）
pub fn read_only_s(path: &Path, no_u: usize) -> Result<(SparseMatrix, Option<Anomaly>)> {
    decode_only_s(open(path)?, path, no_u)
}

pub fn decode_only_s<R: Read>(
    reader: R,
    path: &Path,
    no_u: usize,
) -> Result<(SparseMatrix, Option<Anomaly>)> {
    let mut stream = BinaryStream::new(reader, path);

    let header = stream.read_counts(2, "header")?;
    stream.check_dimension("doubled no_u", 2 * no_u, header[0])?;
    let nnz = header[1];

    let (counts, columns) = stream.read_pattern(2 * no_u, nnz)?;
    let (overlap, anomaly) = stream.read_final_overlap(nnz)?;

    Ok((
        SparseMatrix {
            counts,
            columns,
            hamiltonian: Vec::new(),
            overlap,
        },
        anomaly,
    ))
}

/// 测试用：按 `.gHS` / `.onlyS` 格式编码
#[cfg(test)]
pub(crate) fn encode(header: &[i32], counts: &[i32], columns: &[i32], planes: &[&[f64]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for v in header.iter().chain(counts).chain(columns) {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    for plane in planes {
        for v in plane.iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use std::io::Cursor;

    fn path() -> &'static Path {
        Path::new("test.gHS")
    }

    #[test]
    fn test_decode_ghs() {
        let bytes = encode(&[2, 1, 3], &[2, 1], &[1, 4, 2], &[&[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]]);
        let (m, anomaly) = decode_ghs(Cursor::new(bytes), path(), 2, 1).unwrap();
        assert!(anomaly.is_none());
        assert_eq!(m.counts, vec![2, 1]);
        assert_eq!(m.columns.len(), 3);
        assert_eq!(m.hamiltonian[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(m.overlap, vec![0.1, 0.2, 0.3]);

        let entries: Vec<_> = m.entries().collect();
        assert_eq!(entries, vec![(0, 1, 0), (0, 4, 1), (1, 2, 2)]);
    }

    #[test]
    fn test_header_mismatch_is_structural() {
        let bytes = encode(&[3, 1, 0], &[0, 0, 0], &[], &[]);
        let e = decode_ghs(Cursor::new(bytes), path(), 2, 1).unwrap_err();
        assert!(matches!(e, PhononError::DimensionMismatch { .. }));
        assert_eq!(e.class(), ErrorClass::Structural);

        let bytes = encode(&[2, 2, 0], &[0, 0], &[], &[]);
        assert!(decode_ghs(Cursor::new(bytes), path(), 2, 1).is_err());
    }

    #[test]
    fn test_count_sum_must_match_nnz() {
        let bytes = encode(&[2, 1, 3], &[1, 1], &[1, 2], &[&[1.0, 2.0], &[0.1, 0.2]]);
        let e = decode_ghs(Cursor::new(bytes), path(), 2, 1).unwrap_err();
        assert!(matches!(e, PhononError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_truncated_hamiltonian_is_fatal() {
        let bytes = encode(&[2, 1, 2], &[1, 1], &[1, 2], &[&[1.0]]);
        let e = decode_ghs(Cursor::new(bytes), path(), 2, 1).unwrap_err();
        match e {
            PhononError::TruncatedStream { expected, found, .. } => {
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_columns_is_fatal() {
        let bytes = encode(&[2, 1, 2], &[1, 1], &[1], &[]);
        assert!(matches!(
            decode_ghs(Cursor::new(bytes), path(), 2, 1),
            Err(PhononError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_short_overlap_is_benign() {
        let bytes = encode(&[2, 1, 2], &[1, 1], &[1, 2], &[&[1.0, 2.0], &[0.5]]);
        let (m, anomaly) = decode_ghs(Cursor::new(bytes), path(), 2, 1).unwrap();
        assert_eq!(m.overlap, vec![0.5, 0.0]);
        let anomaly = anomaly.unwrap();
        assert_eq!((anomaly.expected, anomaly.found), (2, 1));
    }

    #[test]
    fn test_decode_only_s() {
        let bytes = encode(&[4, 2], &[1, 0, 1, 0], &[3, 1], &[&[0.7, 0.9]]);
        let (m, anomaly) = decode_only_s(Cursor::new(bytes), Path::new("x_1.onlyS"), 2).unwrap();
        assert!(anomaly.is_none());
        assert!(m.hamiltonian.is_empty());
        assert_eq!(m.counts.len(), 4);
        assert_eq!(m.overlap, vec![0.7, 0.9]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_ghs(Path::new("/nonexistent/x_000.gHS"), 2, 1),
            Err(PhononError::FileNotFound { .. })
        ));
    }
}
