//! 测试用合成 FC 计算
//!
//! 两种布局，所有输入文件写入临时目录，并提供闭式期望值：
//! - `write`：两个原子（第 2 个为动力学原子 C），`no_u = 2`，`nspin = 1`
//! - `write_two_atoms`：三个原子（第 2、3 个为动力学原子 C 与 Au），
//!   轨道表 `0 1 3 5`，`nspin = 2`，含一个不稳定模式
//!
//! 第 1 个原子始终为静止原子，承担平移不变性所需的反作用力。

use crate::models::constants::RYDBERG_TO_EV;
use crate::models::{ElectronicInputs, RunContext};
use crate::parsers::descriptor::{DescriptorFile, DescriptorSource};
use crate::parsers::sparse::encode;
use crate::parsers::tables;
use nalgebra::DMatrix;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const LABEL: &str = "syn";
pub(crate) const DISPLACEMENT: f64 = 0.1;
pub(crate) const CARBON_MASS: f64 = 12.01;
pub(crate) const GOLD_MASS: f64 = 196.97;
/// 单原子布局中动力学原子唯一轨道的下标
pub(crate) const DYNAMIC_ORBITAL: usize = 1;

/// 合成计算的体系布局
struct Layout {
    /// 每个原子的元素符号
    atoms: Vec<&'static str>,
    /// 每个原子的第一个轨道，`n_atoms + 1` 项
    orbital_index: Vec<usize>,
    nspin: usize,
    first: usize,
    last: usize,
    /// 质量加权后的动力学矩阵 (`3·nDyn` 阶)
    dynamical: DMatrix<f64>,
}

impl Layout {
    fn single_atom() -> Self {
        Layout {
            atoms: vec!["Au", "C"],
            orbital_index: vec![0, 1, 2],
            nspin: 1,
            first: 2,
            last: 2,
            dynamical: DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![1.0, 4.0, 9.0])),
        }
    }

    /// 同一方向的两个原子自由度相互耦合，第一个模式不稳定
    fn two_atoms() -> Self {
        let diagonal = [-1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let dynamical = DMatrix::from_fn(6, 6, |i, j| {
            if i == j {
                diagonal[i]
            } else if i % 3 == j % 3 {
                0.1
            } else {
                0.0
            }
        });
        Layout {
            atoms: vec!["Au", "C", "Au"],
            orbital_index: vec![0, 1, 3, 5],
            nspin: 2,
            first: 2,
            last: 3,
            dynamical,
        }
    }

    fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    fn n_dof(&self) -> usize {
        3 * (self.last - self.first + 1)
    }

    fn no_u(&self) -> usize {
        self.orbital_index[self.n_atoms()]
    }

    fn species_id(symbol: &str) -> u32 {
        match symbol {
            "Au" => 1,
            _ => 2,
        }
    }

    fn mass_of_dof(&self, k: usize) -> f64 {
        match self.atoms[self.first - 1 + k / 3] {
            "Au" => GOLD_MASS,
            _ => CARBON_MASS,
        }
    }

    fn descriptor(&self) -> String {
        let dynamic: Vec<String> = self.atoms[self.first - 1..self.last]
            .iter()
            .map(|s| Self::species_id(s).to_string())
            .collect();
        format!(
            "{}\n{}\n2\n1 79 Au\n2 6 C\n{}\n{} {}\n{} Ang\n{}\n",
            LABEL,
            self.n_atoms(),
            self.nspin,
            self.first,
            self.last,
            DISPLACEMENT,
            dynamic.join(" ")
        )
    }

    /// 未做质量加权的力常数 `K[i][j] = A[i][j]·sqrt(m_i·m_j)`
    fn force_constant(&self, i: usize, j: usize) -> f64 {
        self.dynamical[(i, j)] * (self.mass_of_dof(i) * self.mass_of_dof(j)).sqrt()
    }

    /// `.FC` 文件：位移原子自身的行填入占位值，由消除蛋格效应重建
    fn force_constants_file(&self) -> String {
        let n_dof = self.n_dof();
        let mut fc = String::from("Force constants matrix\n");
        for j in 0..n_dof {
            let displaced = self.first - 1 + j / 3;
            let line: String = (0..3 * self.n_atoms())
                .map(|i| {
                    let (atom, x) = (i / 3, i % 3);
                    let v = if atom == displaced {
                        99.0
                    } else if atom == 0 {
                        -(0..n_dof / 3)
                            .map(|b| self.force_constant(3 * b + x, j))
                            .sum::<f64>()
                    } else if atom >= self.first - 1 && atom < self.last {
                        self.force_constant(3 * (atom + 1 - self.first) + x, j)
                    } else {
                        0.0
                    };
                    format!(" {:.15e}", v)
                })
                .collect();
            for _ in 0..2 {
                fc.push_str(&line);
                fc.push('\n');
            }
        }
        fc
    }
}

/// 第 `i` 次计算、自旋 `s` 的 Hamiltonian (Ry)
fn h_ry(i: usize, s: usize, n: usize) -> DMatrix<f64> {
    let (i, s) = (i as f64, s as f64);
    DMatrix::from_fn(n, n, |p, q| {
        if p == q {
            0.1 * i * (1.0 - 0.3 * p as f64) - 0.2 * p as f64 + 0.05 * s
        } else {
            (0.05 + 0.01 * i * i) * (1.0 + 0.5 * s) / (1 + p + q) as f64
        }
    })
}

fn overlap(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |p, q| match p.abs_diff(q) {
        0 => 1.0,
        1 => 0.1,
        _ => 0.0,
    })
}

/// 第 `m` 个 `.onlyS` 文件的交叉块（非对称）
fn cross_block(m: usize, n: usize) -> DMatrix<f64> {
    let m = m as f64;
    DMatrix::from_fn(n, n, |p, q| {
        let delta = if p == q { 1.0 } else { 0.0 };
        delta + 0.005 * m * (1 + p + 2 * q) as f64
    })
}

fn fermi(i: usize) -> f64 {
    -0.1 * i as f64
}

fn row_major(m: &DMatrix<f64>) -> Vec<f64> {
    m.transpose().iter().copied().collect()
}

pub(crate) struct SyntheticRun {
    dir: tempfile::TempDir,
    layout: Layout,
}

impl SyntheticRun {
    pub(crate) fn write() -> Self {
        Self::write_layout(Layout::single_atom())
    }

    pub(crate) fn write_two_atoms() -> Self {
        Self::write_layout(Layout::two_atoms())
    }

    fn write_layout(layout: Layout) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let run = SyntheticRun { dir, layout };
        run.write_text_inputs();
        run.write_binary_inputs();
        run
    }

    pub(crate) fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn descriptor_path(&self) -> PathBuf {
        self.dir().join("inputFC.in")
    }

    /// 期望的质量加权动力学矩阵
    pub(crate) fn dynamical_matrix(&self) -> &DMatrix<f64> {
        &self.layout.dynamical
    }

    /// 自由度 `k` 所属原子的质量
    pub(crate) fn mass_of_dof(&self, k: usize) -> f64 {
        self.layout.mass_of_dof(k)
    }

    fn write_text_inputs(&self) {
        let dir = self.dir();
        let layout = &self.layout;
        fs::write(self.descriptor_path(), layout.descriptor()).unwrap();

        let ef: String = (0..=2 * layout.n_dof())
            .map(|i| format!("{} {}\n", i, fermi(i)))
            .collect();
        fs::write(dir.join(format!("{}.ef", LABEL)), ef).unwrap();

        let orb: Vec<String> = layout.orbital_index.iter().map(|o| o.to_string()).collect();
        fs::write(dir.join(format!("{}.orb", LABEL)), orb.join(" ") + "\n").unwrap();

        let mut xyz = format!("{}\n", layout.n_atoms());
        for (a, symbol) in layout.atoms.iter().enumerate() {
            xyz.push_str(&format!("{} 0.0 0.0 {:.1}\n", symbol, 1.5 * a as f64));
        }
        fs::write(dir.join(format!("{}.xyz", LABEL)), xyz).unwrap();

        fs::write(dir.join(format!("{}.FC", LABEL)), layout.force_constants_file()).unwrap();
    }

    fn write_binary_inputs(&self) {
        let dir = self.dir();
        let n = self.layout.no_u();
        let nspin = self.layout.nspin;

        // 奇数位置的列指向相邻晶胞，回绕后落回 q
        let counts = vec![n as i32; n];
        let columns: Vec<i32> = (0..n)
            .flat_map(|p| (0..n).map(move |q| (q + 1 + if (p + q) % 2 == 1 { n } else { 0 }) as i32))
            .collect();
        let header = [n as i32, nspin as i32, (n * n) as i32];
        let s = row_major(&overlap(n));
        for i in 0..=2 * self.layout.n_dof() {
            let h: Vec<Vec<f64>> = (0..nspin).map(|sp| row_major(&h_ry(i, sp, n))).collect();
            let mut planes: Vec<&[f64]> = h.iter().map(|v| v.as_slice()).collect();
            planes.push(s.as_slice());
            let bytes = encode(&header, &counts, &columns, &planes);
            fs::write(dir.join(format!("{}_{:03}.gHS", LABEL, i)), bytes).unwrap();
        }

        let big_n = 2 * n;
        for m in 1..=6 {
            let x = cross_block(m, n);
            let mut big = DMatrix::<f64>::identity(big_n, big_n);
            big.view_mut((0, n), (n, n)).copy_from(&x);
            big.view_mut((n, 0), (n, n)).copy_from(&x.transpose());
            let values = row_major(&big);
            let columns: Vec<i32> = (0..big_n).flat_map(|_| 1..=big_n as i32).collect();
            let bytes = encode(
                &[big_n as i32, (big_n * big_n) as i32],
                &vec![big_n as i32; big_n],
                &columns,
                &[values.as_slice()],
            );
            fs::write(dir.join(format!("{}_{}.onlyS", LABEL, m)), bytes).unwrap();
        }
    }

    pub(crate) fn context(&self) -> (RunContext, ElectronicInputs) {
        let descriptor = DescriptorFile::new(self.descriptor_path()).load().unwrap();
        let ctx = RunContext::new(&descriptor, self.dir(), self.dir()).unwrap();
        let fermi = tables::read_fermi_levels(&ctx.fermi_path(), ctx.n_dof()).unwrap();
        let orbitals = tables::read_orbital_index(&ctx.orbital_path(), ctx.n_atoms()).unwrap();
        let inputs = ElectronicInputs::new(&ctx, fermi, orbitals).unwrap();
        (ctx, inputs)
    }

    /// 组装后的 Hamiltonian (eV，已按费米能平移)
    fn hamiltonian(&self, i: usize, s: usize) -> DMatrix<f64> {
        let n = self.layout.no_u();
        h_ry(i, s, n) * RYDBERG_TO_EV - overlap(n) * fermi(i)
    }

    /// 修正后 `dH[k, s]` 的闭式期望值
    pub(crate) fn corrected_dh(&self, k: usize, s: usize) -> DMatrix<f64> {
        let n = self.layout.no_u();
        let (m, p) = (2 * k + 1, 2 * k + 2);
        let s0 = overlap(n);
        let dh = (self.hamiltonian(p, s) - self.hamiltonian(m, s) - &s0 * (fermi(p) - fermi(m)))
            / (2.0 * DISPLACEMENT);

        let x = k % 3;
        let ds = (cross_block(2 * x + 2, n) - cross_block(2 * x + 1, n)) / (2.0 * DISPLACEMENT);
        let atom = self.layout.first - 1 + k / 3;
        let rows = self.layout.orbital_index[atom]..self.layout.orbital_index[atom + 1];
        let mut d = DMatrix::<f64>::zeros(n, n);
        for r in rows {
            for q in 0..n {
                d[(r, q)] = ds[(q, r)];
            }
        }

        let h0 = self.hamiltonian(0, s);
        let s0_inv = s0.clone().try_inverse().unwrap();
        &dh - &d * &s0_inv * &h0 - &h0 * &s0_inv * d.transpose()
    }
}
