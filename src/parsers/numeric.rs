//! # 数值标记归一化
//!
//! Gaussian 输出中的科学计数法常使用 Fortran 双精度指数符号 `D`
//! （如 `-0.1234D+02`），Rust 的 `f64::from_str` 不接受这种写法。
//!
//! ## 依赖关系
//! - 被 `parsers/` 下所有解析器使用

use crate::error::{PatrolError, Result};

/// 解析可能带 `D`/`d` 指数符号的浮点数，拒绝 `inf`/`nan`
pub fn parse_fortran_float(token: &str) -> Result<f64> {
    let normalized: String = token
        .chars()
        .map(|c| match c {
            'D' => 'E',
            'd' => 'e',
            other => other,
        })
        .collect();

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PatrolError::InvalidNumber {
            token: token.to_string(),
        }),
    }
}

/// 解析一行中所有空白分隔的数值；任一标记非法则整行失败
pub fn parse_float_fields(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace().map(parse_fortran_float).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fortran_exponent_matches_standard() {
        let d = parse_fortran_float("1.23D+02").unwrap();
        let e = parse_fortran_float("1.23E+02").unwrap();
        assert_eq!(d, e);
        assert!((d - 123.0).abs() < 1e-12);
    }

    #[test]
    fn test_lowercase_fortran_exponent() {
        let v = parse_fortran_float("1.23d-02").unwrap();
        assert!((v - 0.0123).abs() < 1e-15);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_fortran_float("-76.4089").unwrap(), -76.4089);
        assert_eq!(parse_fortran_float("42").unwrap(), 42.0);
    }

    #[test]
    fn test_invalid_token_is_error() {
        let err = parse_fortran_float("Kelvin.").unwrap_err();
        assert!(matches!(err, PatrolError::InvalidNumber { ref token } if token == "Kelvin."));
        assert!(parse_fortran_float("1.2D").is_err());
        assert!(parse_fortran_float("").is_err());
    }

    #[test]
    fn test_non_finite_tokens_rejected() {
        for token in ["nan", "NaN", "inf", "-inf", "infinity", "1D+400"] {
            assert!(parse_fortran_float(token).is_err(), "{} accepted", token);
        }
        assert!(parse_float_fields("12.0 nan 30.0").is_err());
    }

    #[test]
    fn test_parse_float_fields_all_or_nothing() {
        assert_eq!(
            parse_float_fields("  1.0  2.5D+01 -3 ").unwrap(),
            vec![1.0, 25.0, -3.0]
        );
        assert!(parse_float_fields("1.0 ******* 3.0").is_err());
        assert!(parse_float_fields("").unwrap().is_empty());
    }
}
