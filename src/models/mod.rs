//! # 数据模型模块
//!
//! 定义原子体系、运行上下文、声子谱与电声耦合的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `phonon/`, `export/` 和 `commands/` 使用
//! - 子模块: constants, periodic_table, system, run, spectrum

pub mod constants;
pub mod periodic_table;
pub mod run;
pub mod spectrum;
pub mod system;

pub use run::{DisplacementUnit, DynamicAtom, ElectronicInputs, RunContext, RunDescriptor, Species};
pub use spectrum::{CouplingTensor, PhononSpectrum};
pub use system::{Atom, AtomicSystem, DynamicAtomSet, FermiLevelSet, OrbitalIndex};
