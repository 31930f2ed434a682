//! # 解析器模块
//!
//! 按扩展名把 Gaussian 文件分派给对应的解析器。
//!
//! | 扩展名 | 解析器 |
//! |---|---|
//! | `.log` `.out` | `log`（取向块 + 逐行属性扫描） |
//! | `.gjf` `.com` | `gjf`（输入文件分段解析） |
//! | `.fchk` `.fch` | `fchk`（格式化检查点） |
//! | `.chk` | 不解析，返回带警告的记录 |
//! | 其他 | 按计算日志解析，并附带警告 |
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: numeric, orientation, log, gjf, fchk

pub mod fchk;
pub mod gjf;
pub mod log;
pub mod numeric;
pub mod orientation;

use crate::error::{PatrolError, Result};
use crate::models::calculation::meta;
use crate::models::{ParsedCalculation, ParserKind};
use std::fs;
use std::path::Path;

/// 周期性任务中晶格向量伪原子的默认标签
pub const DEFAULT_LATTICE_LABELS: [&str; 7] = ["Tv", "Tv1", "Tv2", "Tv3", "Tv4", "Tv5", "Tv6"];

/// 二进制检查点的提示
pub const BINARY_CHECKPOINT_WARNING: &str =
    "Binary .chk not supported. Convert to .fchk using: formchk input.chk output.fchk";

/// 解析器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// 输入文件几何段中需要忽略的晶格向量标签
    pub lattice_labels: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            lattice_labels: DEFAULT_LATTICE_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParseOptions {
    /// 由逗号分隔的标签列表构造；空列表退回默认值
    pub fn with_lattice_labels(labels: &[String]) -> Self {
        let labels: Vec<String> = labels
            .iter()
            .flat_map(|s| s.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if labels.is_empty() {
            ParseOptions::default()
        } else {
            ParseOptions {
                lattice_labels: labels,
            }
        }
    }

    pub fn is_lattice_label(&self, label: &str) -> bool {
        self.lattice_labels.iter().any(|l| l == label)
    }
}

/// Gaussian 文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFamily {
    Log,
    InputDeck,
    FormattedCheckpoint,
    BinaryCheckpoint,
    /// 未识别的扩展名，按日志处理
    Unknown,
}

impl FileFamily {
    /// 从文件扩展名推断类别（不区分大小写）
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_str() {
            "log" | "out" => FileFamily::Log,
            "gjf" | "com" => FileFamily::InputDeck,
            "fchk" | "fch" => FileFamily::FormattedCheckpoint,
            "chk" => FileFamily::BinaryCheckpoint,
            _ => FileFamily::Unknown,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// 一次性读取整个文件，非 UTF-8 字节按替换字符处理
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PatrolError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            PatrolError::FileReadError {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 解析 Gaussian 文件
///
/// 文件不存在时返回 `FileNotFound`；其余情况总是返回一条记录，
/// 没有识别到任何内容时 `metadata.warning` 会说明原因。
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParsedCalculation> {
    if !path.exists() {
        return Err(PatrolError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let source = path.display().to_string();
    let family = FileFamily::from_path(path);
    tracing::debug!(%source, ?family, "dispatching");

    let mut record = match family {
        FileFamily::Log => log::parse_log_file(path)?,
        FileFamily::InputDeck => gjf::parse_gjf_file(path, options)?,
        FileFamily::FormattedCheckpoint => fchk::parse_fchk_file(path)?,
        FileFamily::BinaryCheckpoint => {
            let mut record = ParsedCalculation::new(source, ParserKind::Unsupported);
            record.set_warning(BINARY_CHECKPOINT_WARNING);
            return Ok(record);
        }
        FileFamily::Unknown => {
            let ext = extension_of(path);
            let mut record = log::parse_log_file(path)?;
            if ext.is_empty() {
                record.set_warning("File has no extension; parsed as a Gaussian log");
            } else {
                record.set_warning(format!(
                    "Unrecognized extension '{}'; parsed as a Gaussian log",
                    ext
                ));
                record.metadata.insert(meta::EXTENSION.to_string(), ext);
            }
            record
        }
    };

    if record.is_empty() && record.warning().is_none() {
        record.set_warning(format!(
            "No recognized {} content found",
            record.parser().unwrap_or("Gaussian")
        ));
    }

    Ok(record)
}
