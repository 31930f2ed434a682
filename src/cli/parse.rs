//! # parse 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use super::ParserArgs;
use clap::Args;
use std::path::PathBuf;

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Gaussian file (.log, .out, .gjf, .com, .fchk, .chk)
    pub file: PathBuf,

    /// Write the JSON record to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    #[command(flatten)]
    pub parser: ParserArgs,
}
