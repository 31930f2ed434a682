//! # 取向块几何提取
//!
//! 从 Gaussian 计算日志中提取最后一个取向块作为最终几何结构。
//! 优化任务每一步都会打印一次取向块，后出现的覆盖先出现的。
//!
//! ## 取向块格式
//! ```text
//!                          Standard orientation:
//!  ---------------------------------------------------------------------
//!  Center     Atomic      Atomic             Coordinates (Angstroms)
//!  Number     Number       Type             X           Y           Z
//!  ---------------------------------------------------------------------
//!       1          8           0        0.000000    0.000000    0.117790
//!       2          1           0        0.000000    0.755453   -0.471161
//!  ---------------------------------------------------------------------
//! ```
//!
//! 块头部布局（分隔线、两行表头、分隔线）是按固定位置跳过的，不逐行校验；
//! 布局变化时只需调整 `ORIENTATION_HEADER_ROWS`。
//!
//! ## 依赖关系
//! - 被 `parsers/log.rs` 使用
//! - 使用 `parsers/numeric.rs`

use crate::parsers::numeric::parse_fortran_float;

use lazy_static::lazy_static;
use regex::Regex;

/// 对称化后的取向块标记
pub const STANDARD_ORIENTATION: &str = "Standard orientation:";

/// 输入取向块标记（NoSymm 任务只打印这一种）
pub const INPUT_ORIENTATION: &str = "Input orientation:";

/// 两条分隔线之间的表头行数
pub const ORIENTATION_HEADER_ROWS: usize = 2;

/// 数据行最少字段数: Center, Atomic Number, Atomic Type, X, Y, Z
const MIN_ROW_FIELDS: usize = 6;

const ATOMIC_NUMBER_FIELD: usize = 1;
const FIRST_COORDINATE_FIELD: usize = 3;

lazy_static! {
    static ref DIVIDER_RE: Regex = Regex::new(r"^\s*-{2,}\s*$").unwrap();
}

/// 提取出的取向块
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrientationBlock {
    /// 块标记所在行号（从 0 开始）
    pub start_line: usize,
    pub atomic_numbers: Vec<u32>,
    pub coordinates: Vec<[f64; 3]>,
    /// 被跳过的数据行
    pub warnings: Vec<String>,
}

/// 块扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    SeekFirstDivider,
    SkipHeaderRows(usize),
    SeekSecondDivider,
    ReadData,
}

/// 是否为分隔线（两个及以上连字符）
pub fn is_divider(line: &str) -> bool {
    DIVIDER_RE.is_match(line)
}

/// 查找最后一个块标记行
pub fn find_last_marker(lines: &[&str], marker: &str) -> Option<usize> {
    lines.iter().rposition(|line| line.trim() == marker)
}

/// 提取最后一个 `marker` 取向块
///
/// 没有找到标记或块中没有有效数据行时返回 `None`。
pub fn extract_last_orientation(lines: &[&str], marker: &str) -> Option<OrientationBlock> {
    let start = find_last_marker(lines, marker)?;

    let mut block = OrientationBlock {
        start_line: start,
        ..Default::default()
    };
    let mut state = BlockState::SeekFirstDivider;
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];
        match state {
            BlockState::SeekFirstDivider => {
                if is_divider(line) {
                    state = BlockState::SkipHeaderRows(ORIENTATION_HEADER_ROWS);
                }
            }
            BlockState::SkipHeaderRows(remaining) => {
                state = if remaining > 1 {
                    BlockState::SkipHeaderRows(remaining - 1)
                } else {
                    BlockState::SeekSecondDivider
                };
            }
            BlockState::SeekSecondDivider => {
                state = BlockState::ReadData;
                if !is_divider(line) {
                    // 缺少第二条分隔线时当前行直接按数据行处理
                    continue;
                }
            }
            BlockState::ReadData => {
                if is_divider(line) {
                    break;
                }
                match parse_orientation_row(line) {
                    Ok((z, xyz)) => {
                        block.atomic_numbers.push(z);
                        block.coordinates.push(xyz);
                    }
                    Err(reason) => {
                        tracing::debug!(line = i + 1, %reason, "skipping orientation row");
                        block.warnings.push(format!(
                            "{} line {}: {}",
                            marker.trim_end_matches(':'),
                            i + 1,
                            reason
                        ));
                    }
                }
            }
        }
        i += 1;
    }

    if block.atomic_numbers.is_empty() {
        None
    } else {
        Some(block)
    }
}

/// 解析单个数据行，返回 (原子序数, [x, y, z])
fn parse_orientation_row(line: &str) -> Result<(u32, [f64; 3]), String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_ROW_FIELDS {
        return Err(format!(
            "expected at least {} fields, found {}",
            MIN_ROW_FIELDS,
            parts.len()
        ));
    }

    let z = parts[ATOMIC_NUMBER_FIELD]
        .parse::<u32>()
        .map_err(|_| format!("invalid atomic number '{}'", parts[ATOMIC_NUMBER_FIELD]))?;

    let mut xyz = [0.0; 3];
    for (k, slot) in xyz.iter_mut().enumerate() {
        *slot = parse_fortran_float(parts[FIRST_COORDINATE_FIELD + k]).map_err(|e| e.to_string())?;
    }

    Ok((z, xyz))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVIDER: &str =
        " ---------------------------------------------------------------------";

    fn orientation_block(rows: &[&str]) -> Vec<String> {
        let mut lines = vec![
            "                         Standard orientation:".to_string(),
            DIVIDER.to_string(),
            " Center     Atomic      Atomic             Coordinates (Angstroms)".to_string(),
            " Number     Number       Type             X           Y           Z".to_string(),
            DIVIDER.to_string(),
        ];
        lines.extend(rows.iter().map(|r| r.to_string()));
        lines.push(DIVIDER.to_string());
        lines
    }

    #[test]
    fn test_is_divider() {
        assert!(is_divider(DIVIDER));
        assert!(is_divider("--"));
        assert!(!is_divider("-"));
        assert!(!is_divider(" --- x ---"));
    }

    #[test]
    fn test_single_block() {
        let text = orientation_block(&[
            "      1          8           0        0.000000    0.000000    0.117790",
            "      2          1           0        0.000000    0.755453   -0.471161",
            "      3          1           0        0.000000   -0.755453   -0.471161",
        ]);
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        let block = extract_last_orientation(&lines, STANDARD_ORIENTATION).unwrap();

        assert_eq!(block.atomic_numbers, vec![8, 1, 1]);
        assert_eq!(block.coordinates[1], [0.0, 0.755453, -0.471161]);
        assert!(block.warnings.is_empty());
    }

    #[test]
    fn test_last_block_wins() {
        let mut text = orientation_block(&[
            "      1          6           0        1.000000    2.000000    3.000000",
            "      2          8           0        4.000000    5.000000    6.000000",
            "      3          8           0        7.000000    8.000000    9.000000",
        ]);
        text.push(" SCF Done:  E(RB3LYP) =  -188.5  A.U. after   10 cycles".to_string());
        text.extend(orientation_block(&[
            "      1          1           0        0.000000    0.000000    0.000000",
            "      2          1           0        0.000000    0.000000    0.000000",
        ]));
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        let block = extract_last_orientation(&lines, STANDARD_ORIENTATION).unwrap();

        assert_eq!(block.atomic_numbers, vec![1, 1]);
        assert_eq!(block.coordinates, vec![[0.0; 3], [0.0; 3]]);
        assert_eq!(block.start_line, 10);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let text = orientation_block(&[
            "      1          8           0        0.000000    0.000000    0.117790",
            "      2          1           0",
            "      3          1           0        0.000000   -0.755453   -0.471161",
        ]);
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        let block = extract_last_orientation(&lines, STANDARD_ORIENTATION).unwrap();

        assert_eq!(block.atomic_numbers, vec![8, 1]);
        assert_eq!(block.coordinates[1], [0.0, -0.755453, -0.471161]);
        assert_eq!(block.warnings.len(), 1);
        assert!(block.warnings[0].contains("line 7"));
    }

    #[test]
    fn test_non_numeric_row_is_skipped() {
        let text = orientation_block(&[
            "      1          X           0        0.000000    0.000000    0.117790",
            "      2          1           0        0.000000    abc        -0.471161",
            "      3          1           0        0.000000   -0.755453   -0.471161",
        ]);
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        let block = extract_last_orientation(&lines, STANDARD_ORIENTATION).unwrap();

        assert_eq!(block.atomic_numbers, vec![1]);
        assert_eq!(block.warnings.len(), 2);
    }

    #[test]
    fn test_no_marker_is_no_geometry() {
        let lines = vec![" SCF Done:  E(RHF) =  -1.0", DIVIDER];
        assert!(extract_last_orientation(&lines, STANDARD_ORIENTATION).is_none());
    }

    #[test]
    fn test_block_without_rows_is_no_geometry() {
        let text = orientation_block(&[]);
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        assert!(extract_last_orientation(&lines, STANDARD_ORIENTATION).is_none());
    }

    #[test]
    fn test_missing_second_divider_reads_following_line() {
        let lines = vec![
            "                         Input orientation:",
            DIVIDER,
            " Center     Atomic      Atomic             Coordinates (Angstroms)",
            " Number     Number       Type             X           Y           Z",
            "      1          6           0        0.100000    0.200000    0.300000",
            DIVIDER,
        ];
        let block = extract_last_orientation(&lines, INPUT_ORIENTATION).unwrap();
        assert_eq!(block.atomic_numbers, vec![6]);
        assert_eq!(block.coordinates, vec![[0.1, 0.2, 0.3]]);
    }
}
