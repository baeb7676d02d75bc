//! # 稠密线性代数辅助
//!
//! 可失败的稠密矩阵分配与三阶张量（矩阵平面序列）。
//!
//! 大矩阵的分配通过 `Vec::try_reserve_exact` 完成，
//! 内存不足时返回 `PhononError::AllocationFailed` 而不是直接中止进程。
//!
//! ## 依赖关系
//! - 被 `phonon/` 使用
//! - 使用 `nalgebra`

use crate::error::{PhononError, Result};
use nalgebra::DMatrix;

/// 分配一个全零 `rows × cols` 矩阵
pub fn try_zeros(rows: usize, cols: usize, what: &str) -> Result<DMatrix<f64>> {
    let elements = rows.checked_mul(cols).ok_or_else(|| PhononError::AllocationFailed {
        what: what.to_string(),
        elements: usize::MAX,
    })?;

    let mut data: Vec<f64> = Vec::new();
    data.try_reserve_exact(elements)
        .map_err(|_| PhononError::AllocationFailed {
            what: what.to_string(),
            elements,
        })?;
    data.resize(elements, 0.0);

    Ok(DMatrix::from_vec(rows, cols, data))
}

/// 三阶张量：等尺寸矩阵平面的有序序列
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3 {
    rows: usize,
    cols: usize,
    planes: Vec<DMatrix<f64>>,
}

impl Tensor3 {
    /// 由已有平面构建，所有平面必须同尺寸
    pub fn from_planes(planes: Vec<DMatrix<f64>>) -> Result<Self> {
        let (rows, cols) = planes.first().map(|p| p.shape()).unwrap_or((0, 0));
        if let Some(p) = planes.iter().find(|p| p.shape() != (rows, cols)) {
            return Err(PhononError::InvalidArgument(format!(
                "tensor planes differ in shape: {}x{} vs {}x{}",
                rows,
                cols,
                p.nrows(),
                p.ncols()
            )));
        }
        Ok(Tensor3 { rows, cols, planes })
    }

    pub fn n_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn plane(&self, idx: usize) -> &DMatrix<f64> {
        &self.planes[idx]
    }
}
