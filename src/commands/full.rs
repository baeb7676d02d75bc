//! # full 命令实现
//!
//! 在声子计算之后继续：参考 Hamiltonian、`S0⁻¹`、`dS`、修正后的 `dH`，
//! 最后收缩成电声耦合矩阵并写出 `.Meph` / `.bMeph`。
//!
//! ## 依赖关系
//! - 使用 `cli/full.rs` 定义的参数
//! - 使用 `commands/phonons.rs` 的声子流程
//! - 使用 `phonon/` 全部子模块, `batch/runner.rs`, `export/meph.rs`

use super::phonons;
use crate::batch::BatchRunner;
use crate::cli::full::FullArgs;
use crate::error::Result;
use crate::export::meph::CouplingFile;
use crate::models::{CouplingTensor, ElectronicInputs, PhononSpectrum, RunContext};
use crate::parsers::tables;
use crate::phonon::{assembler, coupling, derivative};
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 耦合汇总行
#[derive(Debug, Clone, Tabled)]
struct CouplingRow {
    #[tabled(rename = "Mode")]
    mode: usize,
    #[tabled(rename = "E (meV)")]
    energy_mev: String,
    #[tabled(rename = "max |M| (eV)")]
    max_abs: String,
}

/// 执行 full 命令
pub fn execute(args: FullArgs) -> Result<()> {
    let descriptor = args.run.load_descriptor()?;
    let ctx = args.run.context(&descriptor)?;

    let spectrum = phonons::run_phonons(&args.run, &ctx)?;

    output::print_header("Electron-Phonon Coupling");

    let fermi = tables::read_fermi_levels(&ctx.fermi_path(), ctx.n_dof())?;
    let orbitals = tables::read_orbital_index(&ctx.orbital_path(), ctx.n_atoms())?;
    let inputs = ElectronicInputs::new(&ctx, fermi, orbitals)?;
    let no_u = inputs.orbitals.no_u();
    output::print_info(&format!(
        "{} orbitals in the unit cell, {} on dynamic atoms (from orbital {})",
        no_u,
        inputs.n_orb(&ctx),
        inputs.first_orbital(&ctx) + 1
    ));

    let runner = if args.no_progress {
        BatchRunner::new(args.jobs).quiet()
    } else {
        BatchRunner::new(args.jobs)
    };
    let tensor = compute_coupling(&ctx, &inputs, &spectrum, &runner)?;

    report(&spectrum, &tensor);

    let file = CouplingFile::new(&ctx, &inputs, &spectrum, &tensor);
    if !args.binary_only {
        let path = ctx.meph_path();
        file.write_text(&path)?;
        output::print_written("coupling matrices (text)", &path.display().to_string());
    }
    let path = ctx.bmeph_path();
    file.write_binary(&path)?;
    output::print_written("coupling matrices (binary)", &path.display().to_string());

    output::print_done(&format!(
        "{} coupling block(s) for {} positive mode(s)",
        file.blocks.len(),
        file.positive_modes()
    ));
    Ok(())
}

/// 参考计算 → 导数 → 耦合张量，沿途打印读取异常
fn compute_coupling(
    ctx: &RunContext,
    inputs: &ElectronicInputs,
    spectrum: &PhononSpectrum,
    runner: &BatchRunner,
) -> Result<CouplingTensor> {
    let no_u = inputs.orbitals.no_u();

    let spinner = progress::create_spinner("Reading reference Hamiltonian...");
    let loaded = assembler::load_hamiltonian(ctx, 0, no_u, inputs.fermi.undisplaced());
    spinner.finish_and_clear();
    let (reference, anomaly) = loaded?;
    if let Some(a) = anomaly {
        output::print_anomalies(&[a]);
    }

    let s0_inv = derivative::invert_overlap(&reference.overlap)?;
    output::print_success("Reference overlap inverted");

    let (ds, anomalies) = derivative::overlap_derivatives(ctx, no_u)?;
    output::print_anomalies(&anomalies);
    output::print_success("Overlap derivatives from 6 displaced runs");

    output::print_info(&format!(
        "Hamiltonian derivatives: {} degrees of freedom on {} thread(s)",
        ctx.n_dof(),
        runner.jobs()
    ));
    let (dh, anomalies) =
        derivative::hamiltonian_derivatives(ctx, inputs, &reference, &ds, &s0_inv, runner)?;
    output::print_anomalies(&anomalies);
    output::print_success(&format!("{} corrected dH plane(s)", dh.n_planes()));

    coupling::compute(ctx, inputs, spectrum, &dh)
}

fn report(spectrum: &PhononSpectrum, tensor: &CouplingTensor) {
    let mut rows = Vec::new();
    for l in (0..spectrum.n_modes()).rev() {
        match tensor.max_abs(l) {
            Some(m) => rows.push(CouplingRow {
                mode: l + 1,
                energy_mev: format!("{:.4}", spectrum.energies[l] * 1000.0),
                max_abs: format!("{:.6e}", m),
            }),
            None => output::print_skip(&format!(
                "Mode {} has no positive energy; no coupling block",
                l + 1
            )),
        }
    }

    if rows.is_empty() {
        output::print_warning("No mode with positive energy; coupling files hold energies only");
    } else {
        println!("{}", Table::new(rows));
        output::print_info(&format!("{} coupling block(s) computed", tensor.block_count()));
    }
}
