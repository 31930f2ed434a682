//! # parse 命令实现
//!
//! 解析单个 Gaussian 文件，JSON 写到标准输出或指定文件。
//! 记录中的警告通过 `utils::output` 打印到标准错误。
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `parsers::parse_file`
//! - 使用 `utils/output.rs`

use crate::cli::parse::ParseArgs;
use crate::error::{PatrolError, Result};
use crate::parsers;
use crate::utils::output;

use std::fs;

/// 执行 parse 命令
pub fn execute(args: ParseArgs) -> Result<()> {
    let options = args.parser.to_options();
    let record = parsers::parse_file(&args.file, &options)?;

    for warning in &record.warnings {
        output::print_warning(warning);
    }

    let json = super::to_json(&record, args.compact)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json)).map_err(|e| PatrolError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!(
                "{} -> {}",
                args.file.display(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }

    Ok(())
}
