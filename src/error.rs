//! # 统一错误处理模块
//!
//! 定义 phonon-eph 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - Structural: 文件格式/文件头/维度不一致、输入文件缺失
//! - Resource: 内存分配失败、线程池创建失败
//! - Numerical: 本征值求解失败、重叠矩阵奇异
//!
//! 良性异常（稀疏文件最后一个数值块读取不完整）不是错误，
//! 见 `parsers::sparse::Anomaly`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Structural,
    Resource,
    Numerical,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Structural => write!(f, "structural"),
            ErrorClass::Resource => write!(f, "resource"),
            ErrorClass::Numerical => write!(f, "numerical"),
        }
    }
}

/// phonon-eph 统一错误类型
#[derive(Error, Debug)]
pub enum PhononError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 结构错误（格式 / 维度）
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("The file {path} is not written correctly: expected header '{expected}'")]
    HeaderMismatch { path: String, expected: String },

    #[error("Dimension mismatch in {path}: {what} is {found}, expected {expected}")]
    DimensionMismatch {
        path: String,
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected end of {path} while reading {what}: got {found} of {expected} elements")]
    TruncatedStream {
        path: String,
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 资源错误
    // ─────────────────────────────────────────────────────────────
    #[error("Insufficient memory for {what} ({elements} elements)")]
    AllocationFailed { what: String, elements: usize },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    // ─────────────────────────────────────────────────────────────
    // 数值错误
    // ─────────────────────────────────────────────────────────────
    #[error("Eigensolver failed on {what}: {reason}")]
    EigenSolverFailed { what: String, reason: String },

    #[error("Matrix {what} is singular and its inverse could not be computed")]
    SingularMatrix { what: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PhononError {
    /// 错误所属类别
    pub fn class(&self) -> ErrorClass {
        match self {
            PhononError::AllocationFailed { .. } | PhononError::ThreadPool(_) => {
                ErrorClass::Resource
            }
            PhononError::EigenSolverFailed { .. } | PhononError::SingularMatrix { .. } => {
                ErrorClass::Numerical
            }
            _ => ErrorClass::Structural,
        }
    }

    /// 便捷构造：文件读取失败
    pub fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        PhononError::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 便捷构造：文件写入失败
    pub fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        PhononError::FileWriteError {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PhononError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let e = PhononError::SingularMatrix {
            what: "S0".to_string(),
        };
        assert_eq!(e.class(), ErrorClass::Numerical);

        let e = PhononError::AllocationFailed {
            what: "dH".to_string(),
            elements: 10,
        };
        assert_eq!(e.class(), ErrorClass::Resource);

        let e = PhononError::DimensionMismatch {
            path: "x.gHS".to_string(),
            what: "no_u".to_string(),
            expected: 2,
            found: 3,
        };
        assert_eq!(e.class(), ErrorClass::Structural);
    }
}
