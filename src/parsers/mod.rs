//! # 解析器模块
//!
//! 读取 SIESTA 有限差分计算 (FC run) 的各类输入文件。
//!
//! ## 依赖关系
//! - 被 `phonon/` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: descriptor, tables, xyz, force_constants, sparse

pub mod descriptor;
pub mod force_constants;
pub mod sparse;
pub mod tables;
pub mod xyz;

use crate::error::{PhononError, Result};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// 读取整个文本文件
pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PhononError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| PhononError::read(path, e))
}

/// 以空白分隔的词法单元流（`fscanf` 风格读取）
pub(crate) struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    format: &'static str,
    path: &'a Path,
}

impl<'a> Tokens<'a> {
    pub fn new(content: &'a str, format: &'static str, path: &'a Path) -> Self {
        Tokens {
            iter: content.split_whitespace(),
            format,
            path,
        }
    }

    pub fn error(&self, reason: String) -> PhononError {
        PhononError::ParseError {
            format: self.format.to_string(),
            path: self.path.display().to_string(),
            reason,
        }
    }

    /// 下一个原始字符串
    pub fn next_str(&mut self, what: &str) -> Result<&'a str> {
        match self.iter.next() {
            Some(tok) => Ok(tok),
            None => Err(self.error(format!("unexpected end of file while reading {}", what))),
        }
    }

    /// 下一个值，解析为 `T`
    pub fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let tok = self.next_str(what)?;
        tok.parse::<T>()
            .map_err(|_| self.error(format!("invalid {} '{}'", what, tok)))
    }
}
