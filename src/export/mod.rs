//! # 输出模块
//!
//! 电声耦合矩阵（文本/二进制）、Jmol 振动动画文件与声子谱 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`
//! - 子模块: meph, jmol, spectrum

pub mod jmol;
pub mod meph;
pub mod spectrum;

/// 等价于 C 的 `%.{precision}e`：指数带符号且至少两位
pub fn c_exp(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{:.*e}", precision, value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// 等价于 C 的 `% .{precision}e`：非负数前补一个空格
pub fn c_exp_signed(value: f64, precision: usize) -> String {
    if value.is_sign_negative() && !value.is_nan() {
        c_exp(value, precision)
    } else {
        format!(" {}", c_exp(value, precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_exp() {
        assert_eq!(c_exp(0.0, 10), "0.0000000000e+00");
        assert_eq!(c_exp(1234.56, 3), "1.235e+03");
        assert_eq!(c_exp(-0.00012345, 2), "-1.23e-04");
        assert_eq!(c_exp(1.0e-123, 1), "1.0e-123");
        assert_eq!(c_exp(f64::INFINITY, 3), "inf");
    }

    #[test]
    fn test_c_exp_signed() {
        assert_eq!(c_exp_signed(2.5, 2), " 2.50e+00");
        assert_eq!(c_exp_signed(-2.5, 2), "-2.50e+00");
        assert_eq!(c_exp_signed(0.0, 6), " 0.000000e+00");
    }
}
