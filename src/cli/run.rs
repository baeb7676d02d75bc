//! # 运行目录参数
//!
//! `phonons` 与 `full` 共用的参数，并负责把它们解析成 `RunContext`。
//!
//! ## 依赖关系
//! - 被 `cli/phonons.rs`, `cli/full.rs` 通过 `#[command(flatten)]` 使用
//! - 使用 `parsers/descriptor.rs`, `models/run.rs`

use crate::error::{PhononError, Result};
use crate::models::{RunContext, RunDescriptor};
use crate::parsers::descriptor::{DescriptorFile, DescriptorSource};

use clap::Args;
use std::path::PathBuf;

/// 默认运行描述文件名
pub const DEFAULT_DESCRIPTOR: &str = "inputFC.in";

/// 共用的运行参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding the finite-difference run (FC, gHS, onlyS, ef, orb, xyz files)
    pub fc_dir: PathBuf,

    /// Run descriptor file (default: <FC_DIR>/inputFC.in)
    #[arg(short, long)]
    pub descriptor: Option<PathBuf>,

    /// Directory for output files (default: FC_DIR)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write one Jmol animation file per phonon mode (needs <label>.xyz)
    #[arg(long, default_value_t = false)]
    pub jmol: bool,

    /// Export the phonon spectrum to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Do not print the reduced force-constants matrix
    #[arg(long, default_value_t = false)]
    pub quiet_matrix: bool,
}

impl RunArgs {
    pub fn descriptor_path(&self) -> PathBuf {
        self.descriptor
            .clone()
            .unwrap_or_else(|| self.fc_dir.join(DEFAULT_DESCRIPTOR))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.fc_dir.clone())
    }

    /// 读取运行描述
    pub fn load_descriptor(&self) -> Result<RunDescriptor> {
        if !self.fc_dir.is_dir() {
            return Err(PhononError::DirectoryNotFound {
                path: self.fc_dir.display().to_string(),
            });
        }
        DescriptorFile::new(self.descriptor_path()).load()
    }

    /// 构建运行上下文；输出目录不存在时报错
    pub fn context(&self, descriptor: &RunDescriptor) -> Result<RunContext> {
        let output_dir = self.output_dir();
        if !output_dir.is_dir() {
            return Err(PhononError::DirectoryNotFound {
                path: output_dir.display().to_string(),
            });
        }
        RunContext::new(descriptor, &self.fc_dir, &output_dir)
    }
}
