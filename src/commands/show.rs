//! # show 命令实现
//!
//! 读取 `.bMeph` 并打印文件头、声子能量与每个耦合块的最大幅值。
//!
//! ## 依赖关系
//! - 使用 `cli/show.rs` 定义的参数
//! - 使用 `export/meph.rs`

use crate::cli::show::ShowArgs;
use crate::error::Result;
use crate::export::meph::CouplingFile;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 模式行
#[derive(Debug, Clone, Tabled)]
struct BlockRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "E (meV)")]
    energy_mev: String,
    #[tabled(rename = "Spin")]
    spin: String,
    #[tabled(rename = "max |M| (eV)")]
    max_abs: String,
}

/// 执行 show 命令
pub fn execute(args: ShowArgs) -> Result<()> {
    let file = CouplingFile::read_binary(&args.input)?;
    let h = file.header;

    output::print_header(&format!("Coupling Matrices: {}", args.input.display()));
    output::print_info(&format!(
        "{} spin channel(s), {} dynamic atom(s), {} modes",
        h.nspin,
        h.n_dyn,
        h.n_modes()
    ));
    output::print_info(&format!(
        "{} orbitals per block (orbitals {}-{})",
        h.n_orb, h.first_orbital, h.last_orbital
    ));

    let rows = block_rows(&file, args.top_n);
    println!("{}", Table::new(rows));

    let skipped = file.energies.len() - file.positive_modes();
    if skipped > 0 {
        output::print_skip(&format!("{} mode(s) with non-positive energy carry no block", skipped));
    }

    if args.blocks {
        for (b, block) in file.blocks.iter().enumerate() {
            output::print_header(&format!(
                "Mode rank {}, spin {}",
                b / h.nspin.max(1) + 1,
                b % h.nspin.max(1) + 1
            ));
            output::print_matrix(block);
        }
    }

    Ok(())
}

/// 表格行：按能量降序，`top_n = 0` 表示全部
fn block_rows(file: &CouplingFile, top_n: usize) -> Vec<BlockRow> {
    let nspin = file.header.nspin.max(1);
    let limit = if top_n == 0 { file.energies.len() } else { top_n };

    let mut rows = Vec::new();
    for (i, &e) in file.energies.iter().enumerate().take(limit) {
        if e <= 0.0 {
            rows.push(BlockRow {
                rank: i + 1,
                energy_mev: format!("{:.4}", e * 1000.0),
                spin: "-".to_string(),
                max_abs: "-".to_string(),
            });
            continue;
        }
        for s in 0..nspin {
            let max_abs = file
                .blocks
                .get(i * nspin + s)
                .map(|b| format!("{:.6e}", b.amax()))
                .unwrap_or_else(|| "-".to_string());
            rows.push(BlockRow {
                rank: i + 1,
                energy_mev: format!("{:.4}", e * 1000.0),
                spin: (s + 1).to_string(),
                max_abs,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhononError;
    use crate::export::meph::MephHeader;
    use nalgebra::DMatrix;
    use std::path::PathBuf;

    fn file() -> CouplingFile {
        CouplingFile {
            header: MephHeader {
                nspin: 2,
                n_dyn: 1,
                n_orb: 1,
                first_orbital: 3,
                last_orbital: 3,
            },
            energies: vec![0.03, 0.02, 0.0],
            blocks: vec![
                DMatrix::from_element(1, 1, 0.5),
                DMatrix::from_element(1, 1, -0.7),
                DMatrix::from_element(1, 1, 0.1),
                DMatrix::from_element(1, 1, 0.2),
            ],
        }
    }

    #[test]
    fn test_rows_follow_block_order() {
        let rows = block_rows(&file(), 0);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].spin, "2");
        assert_eq!(rows[1].max_abs, "7.000000e-1");
        assert_eq!(rows[4].max_abs, "-");
    }

    #[test]
    fn test_top_n_limits_modes() {
        let rows = block_rows(&file(), 1);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn test_show_reads_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bMeph");
        file().write_binary(&path).unwrap();
        execute(ShowArgs {
            input: path,
            top_n: 0,
            blocks: true,
        })
        .unwrap();
    }

    #[test]
    fn test_show_missing_file() {
        let e = execute(ShowArgs {
            input: PathBuf::from("/nonexistent/none.bMeph"),
            top_n: 0,
            blocks: false,
        })
        .unwrap_err();
        assert!(matches!(e, PhononError::FileNotFound { .. }));
    }
}
