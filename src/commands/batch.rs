//! # batch 命令实现
//!
//! 批量解析 Gaussian 文件，每个输入在输出目录下按相同的相对路径
//! 写出 `<文件名>.json`。
//!
//! ## 功能
//! - 单文件或目录输入，glob 模式过滤，可递归
//! - rayon 并行解析
//! - 已存在的输出默认跳过（`--overwrite` 覆盖）
//! - 汇总成功/跳过/失败数量
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的参数
//! - 使用 `batch/` 收集与执行
//! - 使用 `parsers::parse_file`, `utils/output.rs`

use crate::batch::{FileCollector, BatchRunner, ProcessResult};
use crate::cli::batch::BatchArgs;
use crate::error::{PatrolError, Result};
use crate::parsers::{self, ParseOptions};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    output::print_header("Parsing Gaussian Files");

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(PatrolError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    fs::create_dir_all(&args.output_dir).map_err(|e| PatrolError::FileWriteError {
        path: args.output_dir.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Found {} files, using {} threads",
        files.len(),
        runner.jobs()
    ));

    let options = args.parser.to_options();
    let result = runner.run(&files, |file| {
        process_file(file, &args.input, &args.output_dir, &options, args.overwrite)
    })?;

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "{} parsed, {} skipped, {} failed (of {})",
        result.success,
        result.skipped,
        result.failed,
        result.total()
    ));
    Ok(())
}

/// 输出文件路径：`<输出目录>/<相对输入目录的路径>.json`
///
/// 保留子目录层级，递归收集时同名文件不会互相覆盖。
/// 单文件输入只使用文件名。
fn output_path(file: &Path, input: &Path, output_dir: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(input)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("record"));

    let mut name = relative.into_os_string();
    name.push(".json");
    output_dir.join(name)
}

fn process_file(
    file: &Path,
    input: &Path,
    output_dir: &Path,
    options: &ParseOptions,
    overwrite: bool,
) -> ProcessResult {
    let display = file.display().to_string();
    let target = output_path(file, input, output_dir);

    if target.exists() && !overwrite {
        return ProcessResult::Skipped(display);
    }

    match parse_and_write(file, &target, options) {
        Ok(()) => ProcessResult::Success(display),
        Err(e) => ProcessResult::Failed(display, e.to_string()),
    }
}

fn parse_and_write(file: &Path, target: &Path, options: &ParseOptions) -> Result<()> {
    let record = parsers::parse_file(file, options)?;
    if let Some(warning) = record.warning() {
        tracing::warn!(source = record.source().unwrap_or_default(), "{}", warning);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| PatrolError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let json = super::to_json(&record, false)?;
    fs::write(target, format!("{}\n", json)).map_err(|e| PatrolError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })
}
