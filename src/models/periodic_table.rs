//! # 元素周期表
//!
//! 原子序数、元素符号与原子质量 (amu)。
//!
//! ## 数据来源
//! SIESTA 3.1 内置质量表（Z = 0 为占位项）
//!
//! ## 依赖关系
//! - 被 `models/run.rs` 调用
//! - 纯静态数据，无外部依赖

/// 元素数据
#[derive(Debug, Clone, Copy)]
pub struct ElementData {
    pub symbol: &'static str,
    pub atomic_number: u32,
    pub mass: f64,
}

/// 周期表 (Z = 0..=94)
pub static PERIODIC_TABLE: [ElementData; 95] = [
    ElementData { symbol: "X", atomic_number: 0, mass: 0.00 },
    ElementData { symbol: "H", atomic_number: 1, mass: 1.01 },
    ElementData { symbol: "He", atomic_number: 2, mass: 4.00 },
    ElementData { symbol: "Li", atomic_number: 3, mass: 6.94 },
    ElementData { symbol: "Be", atomic_number: 4, mass: 9.01 },
    ElementData { symbol: "B", atomic_number: 5, mass: 10.81 },
    ElementData { symbol: "C", atomic_number: 6, mass: 12.01 },
    ElementData { symbol: "N", atomic_number: 7, mass: 14.01 },
    ElementData { symbol: "O", atomic_number: 8, mass: 16.00 },
    ElementData { symbol: "F", atomic_number: 9, mass: 19.00 },
    ElementData { symbol: "Ne", atomic_number: 10, mass: 20.18 },
    ElementData { symbol: "Na", atomic_number: 11, mass: 22.99 },
    ElementData { symbol: "Mg", atomic_number: 12, mass: 24.31 },
    ElementData { symbol: "Al", atomic_number: 13, mass: 26.98 },
    ElementData { symbol: "Si", atomic_number: 14, mass: 28.09 },
    ElementData { symbol: "P", atomic_number: 15, mass: 30.97 },
    ElementData { symbol: "S", atomic_number: 16, mass: 32.07 },
    ElementData { symbol: "Cl", atomic_number: 17, mass: 35.45 },
    ElementData { symbol: "Ar", atomic_number: 18, mass: 39.95 },
    ElementData { symbol: "K", atomic_number: 19, mass: 39.10 },
    ElementData { symbol: "Ca", atomic_number: 20, mass: 40.08 },
    ElementData { symbol: "Sc", atomic_number: 21, mass: 44.96 },
    ElementData { symbol: "Ti", atomic_number: 22, mass: 47.88 },
    ElementData { symbol: "V", atomic_number: 23, mass: 50.94 },
    ElementData { symbol: "Cr", atomic_number: 24, mass: 52.00 },
    ElementData { symbol: "Mn", atomic_number: 25, mass: 54.94 },
    ElementData { symbol: "Fe", atomic_number: 26, mass: 55.85 },
    ElementData { symbol: "Co", atomic_number: 27, mass: 58.93 },
    ElementData { symbol: "Ni", atomic_number: 28, mass: 58.69 },
    ElementData { symbol: "Cu", atomic_number: 29, mass: 63.55 },
    ElementData { symbol: "Zn", atomic_number: 30, mass: 65.39 },
    ElementData { symbol: "Ga", atomic_number: 31, mass: 69.72 },
    ElementData { symbol: "Ge", atomic_number: 32, mass: 72.61 },
    ElementData { symbol: "As", atomic_number: 33, mass: 74.92 },
    ElementData { symbol: "Se", atomic_number: 34, mass: 78.96 },
    ElementData { symbol: "Br", atomic_number: 35, mass: 79.90 },
    ElementData { symbol: "Kr", atomic_number: 36, mass: 83.80 },
    ElementData { symbol: "Rb", atomic_number: 37, mass: 85.47 },
    ElementData { symbol: "Sr", atomic_number: 38, mass: 87.62 },
    ElementData { symbol: "Y", atomic_number: 39, mass: 88.91 },
    ElementData { symbol: "Zr", atomic_number: 40, mass: 91.22 },
    ElementData { symbol: "Nb", atomic_number: 41, mass: 92.91 },
    ElementData { symbol: "Mo", atomic_number: 42, mass: 95.94 },
    ElementData { symbol: "Tc", atomic_number: 43, mass: 98.91 },
    ElementData { symbol: "Ru", atomic_number: 44, mass: 101.07 },
    ElementData { symbol: "Rh", atomic_number: 45, mass: 102.91 },
    ElementData { symbol: "Pd", atomic_number: 46, mass: 106.42 },
    ElementData { symbol: "Ag", atomic_number: 47, mass: 107.87 },
    ElementData { symbol: "Cd", atomic_number: 48, mass: 112.41 },
    ElementData { symbol: "In", atomic_number: 49, mass: 114.82 },
    ElementData { symbol: "Sn", atomic_number: 50, mass: 118.71 },
    ElementData { symbol: "Sb", atomic_number: 51, mass: 121.75 },
    ElementData { symbol: "Te", atomic_number: 52, mass: 127.60 },
    ElementData { symbol: "I", atomic_number: 53, mass: 126.90 },
    ElementData { symbol: "Xe", atomic_number: 54, mass: 131.29 },
    ElementData { symbol: "Cs", atomic_number: 55, mass: 132.91 },
    ElementData { symbol: "Ba", atomic_number: 56, mass: 137.33 },
    ElementData { symbol: "La", atomic_number: 57, mass: 138.91 },
    ElementData { symbol: "Ce", atomic_number: 58, mass: 140.12 },
    ElementData { symbol: "Pr", atomic_number: 59, mass: 140.91 },
    ElementData { symbol: "Nd", atomic_number: 60, mass: 144.24 },
    ElementData { symbol: "Pm", atomic_number: 61, mass: 146.92 },
    ElementData { symbol: "Sm", atomic_number: 62, mass: 150.36 },
    ElementData { symbol: "Eu", atomic_number: 63, mass: 151.97 },
    ElementData { symbol: "Gd", atomic_number: 64, mass: 157.25 },
    ElementData { symbol: "Tb", atomic_number: 65, mass: 158.93 },
    ElementData { symbol: "Dy", atomic_number: 66, mass: 162.50 },
    ElementData { symbol: "Ho", atomic_number: 67, mass: 164.93 },
    ElementData { symbol: "Er", atomic_number: 68, mass: 167.26 },
    ElementData { symbol: "Tm", atomic_number: 69, mass: 168.93 },
    ElementData { symbol: "Yb", atomic_number: 70, mass: 173.04 },
    ElementData { symbol: "Lu", atomic_number: 71, mass: 174.97 },
    ElementData { symbol: "Hf", atomic_number: 72, mass: 178.49 },
    ElementData { symbol: "Ta", atomic_number: 73, mass: 180.95 },
    ElementData { symbol: "W", atomic_number: 74, mass: 183.85 },
    ElementData { symbol: "Re", atomic_number: 75, mass: 186.21 },
    ElementData { symbol: "Os", atomic_number: 76, mass: 190.20 },
    ElementData { symbol: "Ir", atomic_number: 77, mass: 192.22 },
    ElementData { symbol: "Pt", atomic_number: 78, mass: 195.08 },
    ElementData { symbol: "Au", atomic_number: 79, mass: 196.97 },
    ElementData { symbol: "Hg", atomic_number: 80, mass: 200.59 },
    ElementData { symbol: "Tl", atomic_number: 81, mass: 204.38 },
    ElementData { symbol: "Pb", atomic_number: 82, mass: 207.20 },
    ElementData { symbol: "Bi", atomic_number: 83, mass: 208.98 },
    ElementData { symbol: "Po", atomic_number: 84, mass: 208.98 },
    ElementData { symbol: "At", atomic_number: 85, mass: 209.99 },
    ElementData { symbol: "Rn", atomic_number: 86, mass: 222.02 },
    ElementData { symbol: "Fr", atomic_number: 87, mass: 223.02 },
    ElementData { symbol: "Ra", atomic_number: 88, mass: 226.03 },
    ElementData { symbol: "Ac", atomic_number: 89, mass: 227.03 },
    ElementData { symbol: "Th", atomic_number: 90, mass: 232.04 },
    ElementData { symbol: "Pa", atomic_number: 91, mass: 231.04 },
    ElementData { symbol: "U", atomic_number: 92, mass: 238.03 },
    ElementData { symbol: "Np", atomic_number: 93, mass: 237.05 },
    ElementData { symbol: "Pu", atomic_number: 94, mass: 244.06 },
];

/// 按原子序数查询
pub fn by_atomic_number(z: u32) -> Option<&'static ElementData> {
    match z {
        0 => None,
        _ => PERIODIC_TABLE.get(z as usize),
    }
}
