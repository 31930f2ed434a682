//! # summary 命令实现
//!
//! 批量解析 Gaussian 文件，打印每个文件的能量与频率概要表，
//! 可选导出 CSV。
//!
//! ## 功能
//! - 与 batch 相同的文件收集与并行解析
//! - `tabled` 终端表格
//! - `csv` 导出（未设置的字段写空串）
//!
//! ## 依赖关系
//! - 使用 `cli/summary.rs` 定义的参数
//! - 使用 `batch/`, `parsers::parse_file`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector};
use crate::cli::summary::SummaryArgs;
use crate::error::{PatrolError, Result};
use crate::models::ParsedCalculation;
use crate::parsers;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 表格未设置字段的占位符
const MISSING: &str = "-";

/// 汇总表的一行
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Parser")]
    pub parser: String,
    #[tabled(rename = "Formula")]
    pub formula: String,
    #[tabled(rename = "Atoms")]
    pub atoms: String,
    #[tabled(rename = "E (Ha)")]
    pub final_energy: String,
    #[tabled(rename = "ZPE (Ha)")]
    pub zero_point_energy: String,
    #[tabled(rename = "G (Ha)")]
    pub free_energy: String,
    #[tabled(rename = "Freqs")]
    pub frequencies: String,
    #[tabled(rename = "Imag")]
    pub imaginary: String,
}

impl SummaryRow {
    pub fn from_record(file: &Path, record: &ParsedCalculation) -> Self {
        let file = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());

        let frequencies = record.vibrational_frequencies.as_ref().map(Vec::len);

        SummaryRow {
            file,
            parser: record.parser().unwrap_or(MISSING).to_string(),
            formula: record.formula().unwrap_or_else(|| MISSING.to_string()),
            atoms: fmt_opt(record.atom_count, |n| n.to_string()),
            final_energy: fmt_energy(record.final_energy),
            zero_point_energy: fmt_energy(record.zero_point_energy),
            free_energy: fmt_energy(record.sum_electronic_and_thermal_free_energy),
            frequencies: fmt_opt(frequencies, |n| n.to_string()),
            imaginary: fmt_opt(frequencies, |_| {
                record.imaginary_frequency_count().to_string()
            }),
        }
    }

    fn csv_fields(&self) -> [&str; 9] {
        [
            &self.file,
            &self.parser,
            &self.formula,
            &self.atoms,
            &self.final_energy,
            &self.zero_point_energy,
            &self.free_energy,
            &self.frequencies,
            &self.imaginary,
        ]
        .map(|s| if s == MISSING { "" } else { s.as_str() })
    }
}

fn fmt_opt<T: Copy>(value: Option<T>, f: impl Fn(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| MISSING.to_string())
}

fn fmt_energy(value: Option<f64>) -> String {
    fmt_opt(value, |e| format!("{:.6}", e))
}

/// 执行 summary 命令
pub fn execute(args: SummaryArgs) -> Result<()> {
    output::print_header("Gaussian Summary");

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(PatrolError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    let options = args.parser.to_options();
    let runner = BatchRunner::new(args.jobs);
    let parsed = runner.map(&files, "Parsing", |file| parsers::parse_file(file, &options))?;

    let mut rows = Vec::with_capacity(files.len());
    for (file, result) in files.iter().zip(parsed) {
        match result {
            Ok(record) => rows.push(SummaryRow::from_record(file, &record)),
            Err(e) => output::print_warning(&format!("Skipping {}: {}", file.display(), e)),
        }
    }

    if rows.is_empty() {
        output::print_warning("No files could be parsed.");
        return Ok(());
    }

    println!("{}", Table::new(&rows));

    if let Some(csv_path) = &args.csv {
        write_csv(&rows, csv_path)?;
        output::print_success(&format!("Summary written to {}", csv_path.display()));
    }

    Ok(())
}

/// 写出 CSV
pub fn write_csv(rows: &[SummaryRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "file",
        "parser",
        "formula",
        "atoms",
        "final_energy_hartree",
        "zero_point_energy_hartree",
        "free_energy_hartree",
        "frequencies",
        "imaginary_frequencies",
    ])?;

    for row in rows {
        wtr.write_record(row.csv_fields())?;
    }

    wtr.flush().map_err(|e| PatrolError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParserArgs;
    use crate::models::ParserKind;
    use std::fs;
    use tempfile::TempDir;

    fn freq_record() -> ParsedCalculation {
        let mut record = ParsedCalculation::new("ts.log", ParserKind::GaussianLog);
        record
            .set_geometry(vec![8, 1, 1], vec![[0.0; 3]; 3])
            .unwrap();
        record.final_energy = Some(-76.4089);
        record.zero_point_energy = Some(0.021);
        record.vibrational_frequencies = Some(vec![-350.2, 1650.0, 3800.0]);
        record
    }

    #[test]
    fn test_row_from_record() {
        let row = SummaryRow::from_record(Path::new("runs/ts.log"), &freq_record());
        assert_eq!(row.file, "ts.log");
        assert_eq!(row.parser, "gaussian-log");
        assert_eq!(row.formula, "H2O");
        assert_eq!(row.atoms, "3");
        assert_eq!(row.final_energy, "-76.408900");
        assert_eq!(row.free_energy, MISSING);
        assert_eq!(row.frequencies, "3");
        assert_eq!(row.imaginary, "1");
    }

    #[test]
    fn test_row_without_frequencies() {
        let record = ParsedCalculation::new("a.chk", ParserKind::Unsupported);
        let row = SummaryRow::from_record(Path::new("a.chk"), &record);
        assert_eq!(row.parser, "unsupported");
        assert_eq!(row.frequencies, MISSING);
        assert_eq!(row.imaginary, MISSING);
    }

    #[test]
    fn test_write_csv_blanks_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        let rows = vec![SummaryRow::from_record(Path::new("ts.log"), &freq_record())];
        write_csv(&rows, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file,parser,formula"));
        assert_eq!(
            lines[1],
            "ts.log,gaussian-log,H2O,3,-76.408900,0.021000,,3,1"
        );
    }

    #[test]
    fn test_execute_with_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.log"),
            " SCF Done:  E(RHF) =  -1.5  A.U.\n Zero-point vibrational energy  0.01 (Joules/Mol)\n",
        )
        .unwrap();
        let csv_path = dir.path().join("out.csv");

        execute(SummaryArgs {
            input: dir.path().to_path_buf(),
            pattern: "*.log".to_string(),
            recursive: false,
            csv: Some(csv_path.clone()),
            jobs: 1,
            parser: ParserArgs::default(),
        })
        .unwrap();

        let text = fs::read_to_string(&csv_path).unwrap();
        assert!(text.contains("a.log,gaussian-log,,,-1.500000,0.010000,,,"));
    }
}
