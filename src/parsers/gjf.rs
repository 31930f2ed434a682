//! # Gaussian 输入文件解析器
//!
//! 解析 Gaussian 输入文件 (.gjf/.com)。
//!
//! ## 输入文件格式
//! ```text
//! %chk=water.chk          # Link0 命令（可选，可多行）
//! #p B3LYP/6-31G(d) Opt   # Route（可多行）
//!
//! water optimization      # 标题
//!
//! 0 1                     # 电荷 多重度
//! O   0.000   0.000   0.117
//! H   0.000   0.757  -0.470
//! H   0.000  -0.757  -0.470
//! Tv  5.000   0.000   0.000   # 周期性任务的晶格向量（忽略）
//!
//! ```
//!
//! 各段按固定顺序读取；格式有问题时尽量返回已读到的部分，不报错。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/element.rs`, `parsers/numeric.rs`

use crate::error::Result;
use crate::models::element;
use crate::models::{ParsedCalculation, ParserKind};
use crate::parsers::numeric::parse_fortran_float;
use crate::parsers::{read_text, ParseOptions};

use std::path::Path;

const LINK0_MARKER: char = '%';
const ROUTE_MARKER: char = '#';

/// 解析输入文件
pub fn parse_gjf_file(path: &Path, options: &ParseOptions) -> Result<ParsedCalculation> {
    let content = read_text(path)?;
    Ok(parse_gjf_content(
        &content,
        &path.display().to_string(),
        options,
    ))
}

/// 从字符串内容解析输入文件
pub fn parse_gjf_content(content: &str, source: &str, options: &ParseOptions) -> ParsedCalculation {
    let lines: Vec<&str> = content.lines().collect();
    let mut record = ParsedCalculation::new(source, ParserKind::GaussianGjf);
    let mut i = 0;

    // Link0
    while i < lines.len() && lines[i].trim().starts_with(LINK0_MARKER) {
        i += 1;
    }

    // Route
    let mut route_lines: Vec<&str> = Vec::new();
    while i < lines.len() && lines[i].trim().starts_with(ROUTE_MARKER) {
        route_lines.push(lines[i].trim());
        i += 1;
    }
    if !route_lines.is_empty() {
        record.route = Some(route_lines.join(" "));
    }

    i = skip_blank(&lines, i);

    // Title
    if i < lines.len() {
        record.title = Some(lines[i].trim_end().to_string());
        i += 1;
    }

    i = skip_blank(&lines, i);

    // Charge / multiplicity
    if i < lines.len() {
        match parse_charge_multiplicity(lines[i]) {
            Some((charge, mult)) => {
                record.charge = Some(charge);
                record.multiplicity = Some(mult);
            }
            None => {
                tracing::debug!(line = i + 1, "no charge/multiplicity pair");
                record
                    .warnings
                    .push(format!("line {}: expected '<charge> <multiplicity>'", i + 1));
            }
        }
        i += 1;
    }

    // Geometry
    let mut numbers: Vec<u32> = Vec::new();
    let mut coords: Vec<[f64; 3]> = Vec::new();
    while i < lines.len() && !lines[i].trim().is_empty() {
        let parts: Vec<&str> = lines[i].split_whitespace().collect();
        if let Some(&label) = parts.first() {
            if options.is_lattice_label(label) || label.starts_with('-') {
                i += 1;
                continue;
            }
            if let (Some(z), true) = (element::atomic_number(label), parts.len() >= 4) {
                match parse_xyz(&parts[1..4]) {
                    Some(xyz) => {
                        numbers.push(z);
                        coords.push(xyz);
                    }
                    None => record
                        .warnings
                        .push(format!("line {}: invalid coordinates", i + 1)),
                }
            }
        }
        i += 1;
    }

    if let Err(e) = record.set_geometry(numbers, coords) {
        record.set_warning(format!("Discarded geometry: {}", e));
    }

    record
}

fn skip_blank(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    i
}

/// 两个整数字段才算有效，否则两者都不设置
fn parse_charge_multiplicity(line: &str) -> Option<(i32, i32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    let charge = parts[0].parse::<i32>().ok()?;
    let mult = parts[1].parse::<i32>().ok()?;
    Some((charge, mult))
}

fn parse_xyz(fields: &[&str]) -> Option<[f64; 3]> {
    let x = parse_fortran_float(fields[0]).ok()?;
    let y = parse_fortran_float(fields[1]).ok()?;
    let z = parse_fortran_float(fields[2]).ok()?;
    Some([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gjf_basic() {
        let content = "%chk=water.chk
%mem=2GB
#p B3LYP/6-31G(d)
# Opt Freq

water optimization

0 1
O   0.000000   0.000000   0.117790
H   0.000000   0.755453  -0.471161
H   0.000000  -0.755453  -0.471161

";
        let record = parse_gjf_content(content, "water.gjf", &ParseOptions::default());

        assert_eq!(record.route.as_deref(), Some("#p B3LYP/6-31G(d) # Opt Freq"));
        assert_eq!(record.title.as_deref(), Some("water optimization"));
        assert_eq!(record.charge, Some(0));
        assert_eq!(record.multiplicity, Some(1));
        assert_eq!(record.atom_count, Some(3));
        assert_eq!(record.atomic_numbers, Some(vec![8, 1, 1]));
        assert_eq!(
            record.atomic_coordinates.as_ref().unwrap()[2],
            [0.0, -0.755453, -0.471161]
        );
        assert_eq!(record.parser(), Some("gaussian-gjf"));
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_lattice_vectors_are_excluded() {
        let content = "#p PBEPBE/6-31G(d) SCF=Tight

graphene

0 1
C   0.000000   0.000000   0.000000
Tv  2.460000   0.000000   0.000000
C   1.230000   0.710000   0.000000
Tv2 -1.230000  2.130000   0.000000
-Tv  1.0 1.0 1.0
";
        let record = parse_gjf_content(content, "graphene.gjf", &ParseOptions::default());

        assert_eq!(record.atomic_numbers, Some(vec![6, 6]));
        assert_eq!(
            record.atomic_coordinates,
            Some(vec![[0.0, 0.0, 0.0], [1.23, 0.71, 0.0]])
        );
    }

    #[test]
    fn test_custom_lattice_labels() {
        let content = "# HF/STO-3G\n\nt\n\n0 1\nH 0 0 0\nXv 1 1 1\n";
        let options = ParseOptions {
            lattice_labels: vec!["Xv".to_string()],
        };
        let record = parse_gjf_content(content, "x.gjf", &options);
        assert_eq!(record.atomic_numbers, Some(vec![1]));
    }

    #[test]
    fn test_bad_charge_line_is_consumed() {
        let content = "# HF/STO-3G

title

zero one
H 0.0 0.0 0.0
H 0.0 0.0 0.74
";
        let record = parse_gjf_content(content, "bad.gjf", &ParseOptions::default());

        assert_eq!(record.charge, None);
        assert_eq!(record.multiplicity, None);
        assert_eq!(record.atomic_numbers, Some(vec![1, 1]));
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_half_valid_charge_line_sets_neither() {
        assert_eq!(parse_charge_multiplicity("0 x"), None);
        assert_eq!(parse_charge_multiplicity("1"), None);
        assert_eq!(parse_charge_multiplicity("-1 2"), Some((-1, 2)));
    }

    #[test]
    fn test_unknown_symbols_and_short_rows_skipped() {
        let content = "# HF

t

0 1
O 0.0 0.0 0.0
Xx 1.0 1.0 1.0
H 1.0 1.0
C1 0.0 0.0 1.0
H 0.0 0.0 0.96
";
        let record = parse_gjf_content(content, "skip.gjf", &ParseOptions::default());
        assert_eq!(record.atomic_numbers, Some(vec![8, 1]));
    }

    #[test]
    fn test_empty_deck() {
        let record = parse_gjf_content("", "empty.gjf", &ParseOptions::default());
        assert!(record.is_empty());
        assert_eq!(record.source(), Some("empty.gjf"));
    }
}
