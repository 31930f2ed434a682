//! # Gaussian 格式化检查点解析器
//!
//! 解析 `formchk` 生成的 .fchk 文件，提取原子序数和当前笛卡尔坐标。
//!
//! ## .fchk 格式说明
//! ```text
//! Charge                                     I                0
//! Multiplicity                               I                1
//! Atomic numbers                             I   N=           3
//!            8           1           1
//! Current cartesian coordinates              R   N=           9
//!   0.00000000E+00  0.00000000E+00  2.22590000E-01  0.00000000E+00  1.42759000E+00
//!  -8.90370000E-01  0.00000000E+00 -1.42759000E+00 -8.90370000E-01
//! Total Energy                               R     -7.640895339860E+01
//! ```
//!
//! 每个字段由一行 `<标签> <类型> <数量或值>` 开头，数组值占据随后若干行，
//! 直到下一个字段头为止。坐标单位为 Bohr，这里不做换算。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/numeric.rs`

use crate::error::Result;
use crate::models::calculation::meta;
use crate::models::{ParsedCalculation, ParserKind};
use crate::parsers::numeric::parse_fortran_float;
use crate::parsers::read_text;

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

pub const ATOMIC_NUMBERS: &str = "Atomic numbers";
pub const CURRENT_COORDINATES: &str = "Current cartesian coordinates";

lazy_static! {
    /// 字段头：以字母开头，类型字符 I/R/L/C/H 后跟数量（数组写作 `N=  n`）或数值
    static ref HEADER_RE: Regex =
        Regex::new(r"^[A-Za-z].*\s+[IRLCH]\s+(?:N=\s*)?[-+]?\d").unwrap();

    /// 附带读取的标量字段
    static ref SCALAR_RE: Regex =
        Regex::new(r"^(Charge|Multiplicity|Total Energy)\s+[IR]\s+(\S+)\s*$").unwrap();
}

/// 是否为字段头
pub fn is_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

/// 从 `start` 开始收集数值标记，直到下一个字段头
///
/// 返回下一个字段头的行号和收集到的标记。
fn read_block<'a>(lines: &[&'a str], start: usize) -> (usize, Vec<&'a str>) {
    let mut tokens = Vec::new();
    let mut i = start;
    while i < lines.len() && !is_header(lines[i]) {
        tokens.extend(lines[i].split_whitespace());
        i += 1;
    }
    (i, tokens)
}

/// 解析 .fchk 文件
pub fn parse_fchk_file(path: &Path) -> Result<ParsedCalculation> {
    let content = read_text(path)?;
    Ok(parse_fchk_content(&content, &path.display().to_string()))
}

/// 从字符串内容解析 .fchk
pub fn parse_fchk_content(content: &str, source: &str) -> ParsedCalculation {
    let lines: Vec<&str> = content.lines().collect();
    let mut record = ParsedCalculation::new(source, ParserKind::GaussianFchk);

    let mut numbers: Option<Vec<u32>> = None;
    let mut coords: Option<Vec<f64>> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if line.starts_with(ATOMIC_NUMBERS) {
            let (next, tokens) = read_block(&lines, i + 1);
            match tokens
                .iter()
                .map(|t| t.parse::<u32>())
                .collect::<std::result::Result<Vec<_>, _>>()
            {
                Ok(values) => numbers = Some(values),
                Err(e) => {
                    numbers = None;
                    record.warnings.push(format!(
                        "line {}: '{}' block is not a list of integers ({})",
                        i + 1,
                        ATOMIC_NUMBERS,
                        e
                    ));
                }
            }
            i = next;
            continue;
        }

        if line.starts_with(CURRENT_COORDINATES) {
            let (next, tokens) = read_block(&lines, i + 1);
            match tokens
                .iter()
                .map(|t| parse_fortran_float(t))
                .collect::<Result<Vec<_>>>()
            {
                Ok(values) => coords = Some(values),
                Err(e) => {
                    coords = None;
                    record.warnings.push(format!(
                        "line {}: '{}' block dropped: {}",
                        i + 1,
                        CURRENT_COORDINATES,
                        e
                    ));
                }
            }
            i = next;
            continue;
        }

        if let Some(caps) = SCALAR_RE.captures(line) {
            apply_scalar(&mut record, &caps[1], &caps[2], i);
        }

        i += 1;
    }

    match numbers {
        Some(numbers) if !numbers.is_empty() => attach_geometry(&mut record, numbers, coords),
        _ => {
            if coords.is_some() {
                tracing::debug!(source, "coordinates without atomic numbers, not reshaped");
                record.warnings.push(format!(
                    "'{}' found without '{}'; coordinates not reshaped",
                    CURRENT_COORDINATES, ATOMIC_NUMBERS
                ));
            }
        }
    }

    record
}

/// 以原子序数数目为准把坐标切分成三元组，多余标记截断
fn attach_geometry(record: &mut ParsedCalculation, numbers: Vec<u32>, coords: Option<Vec<f64>>) {
    let natom = numbers.len();

    let coords = match coords {
        Some(c) if c.len() >= 3 * natom => c,
        Some(c) => {
            record.warnings.push(format!(
                "'{}' has {} values, need {} for {} atoms",
                CURRENT_COORDINATES,
                c.len(),
                3 * natom,
                natom
            ));
            record.set_atomic_numbers(numbers);
            return;
        }
        None => {
            record.set_atomic_numbers(numbers);
            return;
        }
    };

    let triples: Vec<[f64; 3]> = coords
        .chunks_exact(3)
        .take(natom)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    if let Err(e) = record.set_geometry(numbers, triples) {
        record.set_warning(format!("Discarded geometry: {}", e));
        return;
    }
    record
        .metadata
        .insert(meta::COORDINATE_UNITS.to_string(), "bohr".to_string());
}

fn apply_scalar(record: &mut ParsedCalculation, label: &str, value: &str, idx: usize) {
    let parsed = match label {
        "Charge" => value.parse::<i32>().map(|v| record.charge = Some(v)).is_ok(),
        "Multiplicity" => value
            .parse::<i32>()
            .map(|v| record.multiplicity = Some(v))
            .is_ok(),
        _ => parse_fortran_float(value)
            .map(|v| record.final_energy = Some(v))
            .is_ok(),
    };
    if !parsed {
        record
            .warnings
            .push(format!("line {}: invalid {} value '{}'", idx + 1, label, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_FCHK: &str = "water opt
SP        RB3LYP                                                      6-31G(d)
Number of atoms                            I                3
Charge                                     I                0
Multiplicity                               I                1
Atomic numbers                             I   N=           3
           8           1           1
Nuclear charges                            R   N=           3
  8.00000000E+00  1.00000000E+00  1.00000000E+00
Current cartesian coordinates              R   N=           9
  0.00000000E+00  0.00000000E+00  2.22590000E-01  0.00000000E+00  1.42759000E+00
 -8.90370000E-01  0.00000000E+00 -1.42759000E+00 -8.90370000E-01
Force Field                                I                0
Total Energy                               R     -7.640895339860E+01
";

    #[test]
    fn test_header_detection() {
        assert!(is_header("Atomic numbers                             I   N=           3"));
        assert!(is_header("Charge                                     I                0"));
        assert!(is_header("Total Energy                               R     -7.640895339860E+01"));
        assert!(!is_header("           8           1           1"));
        assert!(!is_header("  8.00000000E+00  1.00000000E+00"));
        assert!(!is_header("water opt"));
    }

    #[test]
    fn test_parse_water_fchk() {
        let record = parse_fchk_content(WATER_FCHK, "water.fchk");

        assert_eq!(record.atom_count, Some(3));
        assert_eq!(record.atomic_numbers, Some(vec![8, 1, 1]));
        let coords = record.atomic_coordinates.as_ref().unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], [0.0, 0.0, 0.22259]);
        assert_eq!(coords[1], [0.0, 1.42759, -0.89037]);
        assert_eq!(coords[2], [0.0, -1.42759, -0.89037]);
        assert_eq!(record.charge, Some(0));
        assert_eq!(record.multiplicity, Some(1));
        assert_eq!(record.final_energy, Some(-76.4089533986));
        assert_eq!(record.parser(), Some("gaussian-fchk"));
        assert_eq!(
            record.metadata.get(meta::COORDINATE_UNITS).map(String::as_str),
            Some("bohr")
        );
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_reshape_two_atoms() {
        let content = "Atomic numbers                             I   N=           2
           1           1
Current cartesian coordinates              R   N=           6
  1.0E+00  2.0E+00  3.0E+00  4.0D+00  5.0E+00
  6.0E+00
";
        let record = parse_fchk_content(content, "h2.fchk");
        assert_eq!(record.atom_count, Some(2));
        assert_eq!(
            record.atomic_coordinates,
            Some(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
        );
    }

    #[test]
    fn test_excess_coordinates_truncated() {
        let content = "Atomic numbers                             I   N=           1
           1
Current cartesian coordinates              R   N=           6
  1.0  2.0  3.0  4.0  5.0  6.0
";
        let record = parse_fchk_content(content, "h.fchk");
        assert_eq!(record.atomic_coordinates, Some(vec![[1.0, 2.0, 3.0]]));
    }

    #[test]
    fn test_coordinates_without_atomic_numbers() {
        let content = "Current cartesian coordinates              R   N=           6
  1.0  2.0  3.0  4.0  5.0  6.0
";
        let record = parse_fchk_content(content, "coords.fchk");
        assert!(record.atomic_numbers.is_none());
        assert!(record.atomic_coordinates.is_none());
        assert!(record.atom_count.is_none());
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_too_few_coordinates_keeps_numbers_only() {
        let content = "Atomic numbers                             I   N=           2
           1           1
Current cartesian coordinates              R   N=           3
  1.0  2.0  3.0
";
        let record = parse_fchk_content(content, "short.fchk");
        assert_eq!(record.atomic_numbers, Some(vec![1, 1]));
        assert_eq!(record.atom_count, Some(2));
        assert!(record.atomic_coordinates.is_none());
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_atomic_numbers_block() {
        let content = "Atomic numbers                             I   N=           2
           1           X
";
        let record = parse_fchk_content(content, "bad.fchk");
        assert!(record.atomic_numbers.is_none());
        assert_eq!(record.warnings.len(), 1);
    }
}
