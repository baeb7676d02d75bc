//! # phonons 命令实现
//!
//! 力常数 → 质量加权动力学矩阵 → 声子能量与模式。
//!
//! ## 功能
//! - 打印运行描述与动力学原子
//! - 构建并（可选）打印质量加权力常数矩阵
//! - 对角化，表格显示能量并提示不稳定模式
//! - 可选输出 Jmol 动画文件与 CSV 声子谱
//!
//! ## 依赖关系
//! - 使用 `cli/phonons.rs`, `cli/run.rs` 定义的参数
//! - 使用 `phonon/force_constants.rs`, `phonon/solver.rs`
//! - 使用 `export/jmol.rs`, `export/spectrum.rs`
//! - 被 `commands/full.rs` 复用

use crate::cli::phonons::PhononsArgs;
use crate::cli::run::RunArgs;
use crate::error::Result;
use crate::export::{jmol, spectrum as spectrum_csv};
use crate::models::constants::EV_TO_WAVENUMBER;
use crate::models::{PhononSpectrum, RunContext};
use crate::parsers::xyz;
use crate::phonon::{force_constants, solver};
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 动力学原子行
#[derive(Debug, Clone, Tabled)]
struct AtomRow {
    #[tabled(rename = "Atom")]
    id: usize,
    #[tabled(rename = "Element")]
    symbol: String,
    #[tabled(rename = "Z")]
    atomic_number: u32,
    #[tabled(rename = "Mass (amu)")]
    mass: String,
}

/// 声子能量行
#[derive(Debug, Clone, Tabled)]
struct ModeRow {
    #[tabled(rename = "Mode")]
    mode: usize,
    #[tabled(rename = "Eigenvalue")]
    eigenvalue: String,
    #[tabled(rename = "E (meV)")]
    energy_mev: String,
    #[tabled(rename = "ν (cm⁻¹)")]
    wavenumber: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// 执行 phonons 命令
pub fn execute(args: PhononsArgs) -> Result<()> {
    let descriptor = args.run.load_descriptor()?;
    let ctx = args.run.context(&descriptor)?;

    run_phonons(&args.run, &ctx)?;

    output::print_done("Phonon calculation finished");
    Ok(())
}

/// 声子部分的完整流程，返回声子谱供 `full` 继续使用
pub(crate) fn run_phonons(args: &RunArgs, ctx: &RunContext) -> Result<PhononSpectrum> {
    output::print_header("Phonon Modes");
    print_run_summary(ctx);

    let spinner = progress::create_spinner("Building force constants...");
    let built = force_constants::load(ctx);
    spinner.finish_and_clear();
    let fc = built?;
    output::print_success(&format!(
        "Force constants reduced to {}x{} (egg-box corrected, mass scaled)",
        fc.nrows(),
        fc.ncols()
    ));

    if !args.quiet_matrix {
        output::print_header("Mass-Scaled Force Constants (eV/Å²/amu)");
        output::print_matrix(&fc);
    }

    let spectrum = solver::solve(fc)?;

    output::print_header("Phonon Energies");
    println!("{}", Table::new(mode_rows(&spectrum)));

    let unstable = spectrum.unstable_count();
    if unstable > 0 {
        output::print_warning(&format!(
            "{} unstable mode(s) with negative eigenvalue; their energies are set to 0",
            unstable
        ));
    }

    if !args.quiet_matrix {
        output::print_header("Phonon Modes (one column per mode)");
        output::print_matrix(&spectrum.modes);
    }

    if args.jmol {
        let system = xyz::read_xyz(&ctx.xyz_path(), ctx.n_atoms())?;
        let written = jmol::write_all(ctx, &system, &spectrum)?;
        output::print_success(&format!(
            "{} Jmol animation file(s) written to '{}'",
            written.len(),
            ctx.output_dir().display()
        ));
    }

    if let Some(ref path) = args.csv {
        spectrum_csv::to_csv(&spectrum, path)?;
        output::print_written("phonon spectrum", &path.display().to_string());
    }

    Ok(spectrum)
}

fn print_run_summary(ctx: &RunContext) {
    output::print_info(&format!("Run directory: '{}'", ctx.fc_dir().display()));
    output::print_info(&format!(
        "System '{}': {} atoms, {} spin channel(s)",
        ctx.label(),
        ctx.n_atoms(),
        ctx.nspin()
    ));
    output::print_info(&format!(
        "Dynamic atoms {}-{} ({} degrees of freedom), displacement {} Å",
        ctx.dynamic().first(),
        ctx.dynamic().last(),
        ctx.n_dof(),
        ctx.displacement()
    ));

    let rows: Vec<AtomRow> = ctx
        .dynamic_atoms()
        .iter()
        .map(|a| AtomRow {
            id: a.id,
            symbol: a.symbol.clone(),
            atomic_number: a.atomic_number,
            mass: format!("{:.4}", a.mass),
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn mode_rows(spectrum: &PhononSpectrum) -> Vec<ModeRow> {
    (0..spectrum.n_modes())
        .map(|i| {
            let e = spectrum.signed_energies[i];
            ModeRow {
                mode: i + 1,
                eigenvalue: format!("{:.6e}", spectrum.eigenvalues[i]),
                energy_mev: format!("{:.4}", e * 1000.0),
                wavenumber: format!("{:.2}", e * EV_TO_WAVENUMBER),
                status: if spectrum.unstable[i] {
                    "unstable".to_string()
                } else {
                    "ok".to_string()
                },
            }
        })
        .collect()
}
