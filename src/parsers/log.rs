//! # Gaussian 计算日志解析器
//!
//! 解析 Gaussian 输出文件 (.log/.out)，提取电荷/多重度、最终几何结构、
//! SCF 能量、热化学数据和振动频率。
//!
//! 每个可识别的属性是一条 `LinePattern` 描述：匹配用的正则、写入策略和
//! 目标字段。扫描循环对每一行按表中顺序测试所有仍满足前置条件的描述，
//! 一行匹配某个属性后仍会继续测试后面的属性。
//!
//! ## 写入策略
//! - `ScalarOnce`: 只取第一次出现的值（热化学、温度、电荷/多重度）
//! - `AppendLast`: 每次出现都追加，同时覆盖"最终值"（SCF 能量）
//! - `ArrayAppend`: 每次出现都把整行数值追加到数组（频率、IR 强度、约化质量）
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/orientation.rs`, `parsers/numeric.rs`
//! - 使用 `models/calculation.rs`

use crate::error::{PatrolError, Result};
use crate::models::calculation::{meta, non_empty};
use crate::models::{ParsedCalculation, ParserKind};
use crate::parsers::numeric::{parse_float_fields, parse_fortran_float};
use crate::parsers::orientation::{self, INPUT_ORIENTATION, STANDARD_ORIENTATION};
use crate::parsers::read_text;

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// 数值字面量，允许 Fortran 的 D 指数
const FLOAT: &str = r"[-+]?\d+(?:\.\d*)?(?:[DEde][+-]?\d+)?";

/// 属性写入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    ScalarOnce,
    AppendLast,
    ArrayAppend,
}

/// 扫描目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    ChargeMultiplicity,
    ScfEnergy,
    ZeroPointEnergy,
    SumZeroPoint,
    SumThermalEnergy,
    SumThermalEnthalpy,
    SumThermalFreeEnergy,
    Temperature,
    Frequencies,
    IrIntensities,
    ReducedMasses,
}

/// 单个属性的匹配描述
pub struct LinePattern {
    pub property: Property,
    pub policy: Policy,
    pub regex: Regex,
}

impl LinePattern {
    fn new(property: Property, policy: Policy, pattern: &str) -> Self {
        LinePattern {
            property,
            policy,
            regex: Regex::new(pattern).unwrap(),
        }
    }
}

lazy_static! {
    /// 按优先级排列的属性表
    pub static ref LOG_PATTERNS: Vec<LinePattern> = vec![
        LinePattern::new(
            Property::ChargeMultiplicity,
            Policy::ScalarOnce,
            r"Charge\s*=\s*(-?\d+)\s+Multiplicity\s*=\s*(\d+)",
        ),
        LinePattern::new(
            Property::ScfEnergy,
            Policy::AppendLast,
            &format!(r"SCF Done:\s+E\([^\)]+\)\s*=\s*({})", FLOAT),
        ),
        LinePattern::new(
            Property::ZeroPointEnergy,
            Policy::ScalarOnce,
            &format!(r"Zero-point vibrational energy\s+({})", FLOAT),
        ),
        LinePattern::new(
            Property::SumZeroPoint,
            Policy::ScalarOnce,
            &format!(r"Sum of electronic and zero-point Energies=\s*({})", FLOAT),
        ),
        LinePattern::new(
            Property::SumThermalEnergy,
            Policy::ScalarOnce,
            &format!(r"Sum of electronic and thermal Energies=\s*({})", FLOAT),
        ),
        LinePattern::new(
            Property::SumThermalEnthalpy,
            Policy::ScalarOnce,
            &format!(r"Sum of electronic and thermal Enthalpies=\s*({})", FLOAT),
        ),
        LinePattern::new(
            Property::SumThermalFreeEnergy,
            Policy::ScalarOnce,
            &format!(r"Sum of electronic and thermal Free Energies=\s*({})", FLOAT),
        ),
        LinePattern::new(
            Property::Temperature,
            Policy::ScalarOnce,
            &format!(r"Temperature\s+({})", FLOAT),
        ),
        LinePattern::new(
            Property::Frequencies,
            Policy::ArrayAppend,
            r"Frequencies --\s*(.*)",
        ),
        LinePattern::new(
            Property::IrIntensities,
            Policy::ArrayAppend,
            r"IR Inten\s+--\s*(.*)",
        ),
        LinePattern::new(
            Property::ReducedMasses,
            Policy::ArrayAppend,
            r"(?i)Red\.?\s*masses\s+--\s*(.*)",
        ),
    ];
}

/// 从匹配中取出的值
#[derive(Debug, Clone, PartialEq)]
enum Captured {
    Pair(i32, i32),
    Scalar(f64),
    Row(Vec<f64>),
}

/// 单遍扫描累积的状态
#[derive(Debug, Default)]
struct ScanState {
    charge: Option<i32>,
    multiplicity: Option<i32>,
    scf_energies: Vec<f64>,
    final_energy: Option<f64>,
    zero_point_energy: Option<f64>,
    sum_zero_point: Option<f64>,
    sum_thermal_energy: Option<f64>,
    sum_thermal_enthalpy: Option<f64>,
    sum_thermal_free_energy: Option<f64>,
    temperature: Option<f64>,
    frequencies: Vec<f64>,
    ir_intensities: Vec<f64>,
    reduced_masses: Vec<f64>,
    warnings: Vec<String>,
}

impl ScanState {
    /// 标量属性是否已经取到值
    fn is_set(&self, property: Property) -> bool {
        match property {
            Property::ChargeMultiplicity => self.charge.is_some() && self.multiplicity.is_some(),
            Property::ZeroPointEnergy => self.zero_point_energy.is_some(),
            Property::SumZeroPoint => self.sum_zero_point.is_some(),
            Property::SumThermalEnergy => self.sum_thermal_energy.is_some(),
            Property::SumThermalEnthalpy => self.sum_thermal_enthalpy.is_some(),
            Property::SumThermalFreeEnergy => self.sum_thermal_free_energy.is_some(),
            Property::Temperature => self.temperature.is_some(),
            Property::ScfEnergy
            | Property::Frequencies
            | Property::IrIntensities
            | Property::ReducedMasses => false,
        }
    }

    fn scalar_slot(&mut self, property: Property) -> Option<&mut Option<f64>> {
        match property {
            Property::ZeroPointEnergy => Some(&mut self.zero_point_energy),
            Property::SumZeroPoint => Some(&mut self.sum_zero_point),
            Property::SumThermalEnergy => Some(&mut self.sum_thermal_energy),
            Property::SumThermalEnthalpy => Some(&mut self.sum_thermal_enthalpy),
            Property::SumThermalFreeEnergy => Some(&mut self.sum_thermal_free_energy),
            Property::Temperature => Some(&mut self.temperature),
            _ => None,
        }
    }

    fn array_slot(&mut self, property: Property) -> Option<&mut Vec<f64>> {
        match property {
            Property::Frequencies => Some(&mut self.frequencies),
            Property::IrIntensities => Some(&mut self.ir_intensities),
            Property::ReducedMasses => Some(&mut self.reduced_masses),
            _ => None,
        }
    }

    fn apply(&mut self, pattern: &LinePattern, value: Captured) {
        match (pattern.policy, value) {
            (Policy::ScalarOnce, Captured::Pair(charge, mult)) => {
                self.charge = Some(charge);
                self.multiplicity = Some(mult);
            }
            (Policy::ScalarOnce, Captured::Scalar(v)) => {
                if let Some(slot) = self.scalar_slot(pattern.property) {
                    slot.get_or_insert(v);
                }
            }
            (Policy::AppendLast, Captured::Scalar(v)) => {
                self.scf_energies.push(v);
                self.final_energy = Some(v);
            }
            (Policy::ArrayAppend, Captured::Row(values)) => {
                if let Some(slot) = self.array_slot(pattern.property) {
                    slot.extend(values);
                }
            }
            (policy, value) => {
                tracing::error!(?policy, ?value, "pattern policy does not fit captured value");
            }
        }
    }
}

/// 从正则匹配中取值
fn capture(property: Property, caps: &regex::Captures<'_>) -> Result<Captured> {
    match property {
        Property::ChargeMultiplicity => {
            let charge = parse_int(&caps[1])?;
            let mult = parse_int(&caps[2])?;
            Ok(Captured::Pair(charge, mult))
        }
        Property::Frequencies | Property::IrIntensities | Property::ReducedMasses => {
            Ok(Captured::Row(parse_float_fields(&caps[1])?))
        }
        _ => Ok(Captured::Scalar(parse_fortran_float(&caps[1])?)),
    }
}

fn parse_int(token: &str) -> Result<i32> {
    token.parse().map_err(|_| PatrolError::InvalidNumber {
        token: token.to_string(),
    })
}

/// 扫描全部行并把结果写入记录
fn scan_properties(lines: &[&str], record: &mut ParsedCalculation) {
    let mut state = ScanState::default();

    for (idx, line) in lines.iter().enumerate() {
        for pattern in LOG_PATTERNS.iter() {
            if pattern.policy == Policy::ScalarOnce && state.is_set(pattern.property) {
                continue;
            }
            let caps = match pattern.regex.captures(line) {
                Some(caps) => caps,
                None => continue,
            };
            match capture(pattern.property, &caps) {
                Ok(value) => state.apply(pattern, value),
                Err(e) => {
                    tracing::debug!(line = idx + 1, property = ?pattern.property, error = %e, "dropping match");
                    state
                        .warnings
                        .push(format!("line {}: {:?} dropped: {}", idx + 1, pattern.property, e));
                }
            }
        }
    }

    record.charge = state.charge;
    record.multiplicity = state.multiplicity;
    record.scf_energies = non_empty(state.scf_energies);
    record.final_energy = state.final_energy;
    record.zero_point_energy = state.zero_point_energy;
    record.sum_electronic_and_zero_point = state.sum_zero_point;
    record.sum_electronic_and_thermal_energy = state.sum_thermal_energy;
    record.sum_electronic_and_thermal_enthalpy = state.sum_thermal_enthalpy;
    record.sum_electronic_and_thermal_free_energy = state.sum_thermal_free_energy;
    record.temperature = state.temperature;
    record.vibrational_frequencies = non_empty(state.frequencies);
    record.infrared_intensities = non_empty(state.ir_intensities);
    record.vibrational_reduced_masses = non_empty(state.reduced_masses);
    record.warnings.extend(state.warnings);
}

/// 解析 Gaussian 计算日志文件
pub fn parse_log_file(path: &Path) -> Result<ParsedCalculation> {
    let content = read_text(path)?;
    Ok(parse_log_content(&content, &path.display().to_string()))
}

/// 从字符串内容解析计算日志
pub fn parse_log_content(content: &str, source: &str) -> ParsedCalculation {
    let lines: Vec<&str> = content.lines().collect();
    let mut record = ParsedCalculation::new(source, ParserKind::GaussianLog);

    scan_properties(&lines, &mut record);

    // 只有完全没有 Standard orientation 时才退回 Input orientation；
    // 最后一个 Standard 块没有有效行时不取几何结构
    let marker = if orientation::find_last_marker(&lines, STANDARD_ORIENTATION).is_some() {
        STANDARD_ORIENTATION
    } else {
        INPUT_ORIENTATION
    };

    if let Some(block) = orientation::extract_last_orientation(&lines, marker) {
        record.warnings.extend(block.warnings);
        match record.set_geometry(block.atomic_numbers, block.coordinates) {
            Ok(()) => {
                record.metadata.insert(
                    meta::GEOMETRY_SOURCE.to_string(),
                    marker.trim_end_matches(':').to_string(),
                );
                record
                    .metadata
                    .insert(meta::COORDINATE_UNITS.to_string(), "angstrom".to_string());
            }
            Err(e) => record.set_warning(format!("Discarded orientation block: {}", e)),
        }
    }

    tracing::info!(
        source,
        atoms = record.atom_count.unwrap_or(0),
        scf_energies = record.scf_energies.as_ref().map_or(0, Vec::len),
        skipped = record.warnings.len(),
        "parsed Gaussian log"
    );

    record
}
