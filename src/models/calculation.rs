//! # Gaussian 解析结果数据模型
//!
//! 三种文件（计算日志、输入文件、格式化检查点）解析后统一写入
//! `ParsedCalculation`，序列化为 camelCase 键名的 JSON。
//!
//! ## 依赖关系
//! - 被 `parsers/` 下所有解析器填充
//! - 被 `commands/` 序列化和汇总

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 产生记录的解析器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// 计算日志 (.log/.out)
    GaussianLog,
    /// 输入文件 (.gjf/.com)
    GaussianGjf,
    /// 格式化检查点 (.fchk)
    GaussianFchk,
    /// 二进制检查点 (.chk)，不解析
    Unsupported,
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserKind::GaussianLog => write!(f, "gaussian-log"),
            ParserKind::GaussianGjf => write!(f, "gaussian-gjf"),
            ParserKind::GaussianFchk => write!(f, "gaussian-fchk"),
            ParserKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// metadata 中使用的键
pub mod meta {
    pub const SOURCE: &str = "source";
    pub const PARSER: &str = "parser";
    pub const WARNING: &str = "warning";
    pub const GEOMETRY_SOURCE: &str = "geometrySource";
    pub const EXTENSION: &str = "extension";
    pub const COORDINATE_UNITS: &str = "coordinateUnits";
}

/// 几何结构长度不一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryMismatch {
    pub atoms: usize,
    pub coordinates: usize,
}

impl fmt::Display for GeometryMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} atomic numbers but {} coordinate triples",
            self.atoms, self.coordinates
        )
    }
}

/// Gaussian 文件解析结果
///
/// 所有字段默认为未设置；解析器只填充在源文件中找到的部分。
/// 能量单位为 Hartree，温度为 K，频率为 cm^-1。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCalculation {
    /// Route 行（仅输入文件）
    pub route: Option<String>,

    /// 标题（仅输入文件）
    pub title: Option<String>,

    /// 净电荷
    pub charge: Option<i32>,

    /// 自旋多重度
    pub multiplicity: Option<i32>,

    /// 原子数，等于 `atomic_numbers` 的长度
    pub atom_count: Option<usize>,

    /// 原子序数
    pub atomic_numbers: Option<Vec<u32>>,

    /// 笛卡尔坐标，与 `atomic_numbers` 一一对应
    pub atomic_coordinates: Option<Vec<[f64; 3]>>,

    /// 按出现顺序记录的所有 SCF 能量
    pub scf_energies: Option<Vec<f64>>,

    /// 最后一个 SCF 能量
    pub final_energy: Option<f64>,

    /// 零点振动能
    pub zero_point_energy: Option<f64>,

    pub sum_electronic_and_zero_point: Option<f64>,
    pub sum_electronic_and_thermal_energy: Option<f64>,
    pub sum_electronic_and_thermal_enthalpy: Option<f64>,
    pub sum_electronic_and_thermal_free_energy: Option<f64>,

    /// 热化学温度 (K)
    pub temperature: Option<f64>,

    /// 振动频率；与红外强度、约化质量按模式对齐，但长度不保证相同
    pub vibrational_frequencies: Option<Vec<f64>>,
    pub infrared_intensities: Option<Vec<f64>>,
    pub vibrational_reduced_masses: Option<Vec<f64>>,

    /// 来源、解析器、警告等附加信息
    pub metadata: BTreeMap<String, String>,

    /// 扫描过程中被跳过的行及原因
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ParsedCalculation {
    /// 创建带来源和解析器信息的空记录
    pub fn new(source: impl Into<String>, parser: ParserKind) -> Self {
        let mut record = ParsedCalculation::default();
        record.metadata.insert(meta::SOURCE.to_string(), source.into());
        record
            .metadata
            .insert(meta::PARSER.to_string(), parser.to_string());
        record
    }

    /// 同时设置原子序数和坐标，长度不一致时拒绝写入
    ///
    /// 空列表视为"没有几何结构"，三个几何字段都保持未设置。
    pub fn set_geometry(
        &mut self,
        atomic_numbers: Vec<u32>,
        coordinates: Vec<[f64; 3]>,
    ) -> Result<(), GeometryMismatch> {
        if atomic_numbers.len() != coordinates.len() {
            return Err(GeometryMismatch {
                atoms: atomic_numbers.len(),
                coordinates: coordinates.len(),
            });
        }
        if atomic_numbers.is_empty() {
            self.atom_count = None;
            self.atomic_numbers = None;
            self.atomic_coordinates = None;
        } else {
            self.atom_count = Some(atomic_numbers.len());
            self.atomic_numbers = Some(atomic_numbers);
            self.atomic_coordinates = Some(coordinates);
        }
        Ok(())
    }

    /// 只设置原子序数（没有可用坐标时），坐标保持未设置
    pub fn set_atomic_numbers(&mut self, atomic_numbers: Vec<u32>) {
        self.atomic_coordinates = None;
        if atomic_numbers.is_empty() {
            self.atom_count = None;
            self.atomic_numbers = None;
        } else {
            self.atom_count = Some(atomic_numbers.len());
            self.atomic_numbers = Some(atomic_numbers);
        }
    }

    /// 记录一条警告到 metadata（只保留第一条作为主警告）和 warnings 列表
    pub fn set_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.metadata
            .entry(meta::WARNING.to_string())
            .or_insert_with(|| message.clone());
        self.warnings.push(message);
    }

    pub fn warning(&self) -> Option<&str> {
        self.metadata.get(meta::WARNING).map(String::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(meta::SOURCE).map(String::as_str)
    }

    pub fn parser(&self) -> Option<&str> {
        self.metadata.get(meta::PARSER).map(String::as_str)
    }

    /// 是否没有任何解析出的内容（metadata 与 warnings 不计）
    pub fn is_empty(&self) -> bool {
        self.route.is_none()
            && self.title.is_none()
            && self.charge.is_none()
            && self.multiplicity.is_none()
            && self.atomic_numbers.is_none()
            && self.atomic_coordinates.is_none()
            && self.scf_energies.is_none()
            && self.final_energy.is_none()
            && self.zero_point_energy.is_none()
            && self.sum_electronic_and_zero_point.is_none()
            && self.sum_electronic_and_thermal_energy.is_none()
            && self.sum_electronic_and_thermal_enthalpy.is_none()
            && self.sum_electronic_and_thermal_free_energy.is_none()
            && self.temperature.is_none()
            && self.vibrational_frequencies.is_none()
            && self.infrared_intensities.is_none()
            && self.vibrational_reduced_masses.is_none()
    }

    /// 虚频数目（负频率）
    pub fn imaginary_frequency_count(&self) -> usize {
        self.vibrational_frequencies
            .as_ref()
            .map(|freqs| freqs.iter().filter(|&&f| f < 0.0).count())
            .unwrap_or(0)
    }

    /// 按原子序数计算化学式（Hill 顺序：C、H 在前，其余按字母）
    pub fn formula(&self) -> Option<String> {
        use crate::models::element;
        use std::collections::BTreeMap as Counts;

        let numbers = self.atomic_numbers.as_ref()?;
        let mut counts: Counts<&str, usize> = Counts::new();
        for &z in numbers {
            let sym = element::symbol(z).unwrap_or("X");
            *counts.entry(sym).or_insert(0) += 1;
        }

        let mut ordered: Vec<(&str, usize)> = Vec::new();
        if counts.contains_key("C") {
            for key in ["C", "H"] {
                if let Some(n) = counts.remove(key) {
                    ordered.push((key, n));
                }
            }
        }
        ordered.extend(counts);

        Some(
            ordered
                .into_iter()
                .map(|(el, n)| {
                    if n == 1 {
                        el.to_string()
                    } else {
                        format!("{}{}", el, n)
                    }
                })
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

/// 空列表归一化为 None
pub(crate) fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
