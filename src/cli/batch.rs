//! # batch 子命令 CLI 定义
//!
//! 批量解析 Gaussian 文件，每个输入在输出目录的对应子目录写出 `<文件名>.json`
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use super::ParserArgs;
use crate::batch::collector::DEFAULT_PATTERNS;
use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// File patterns to match (comma-separated)
    #[arg(short, long, default_value = DEFAULT_PATTERNS)]
    pub pattern: String,

    /// Search subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Directory for the JSON records
    #[arg(short, long, default_value = "parsed")]
    pub output_dir: PathBuf,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, env = "PATROL_JOBS", default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing JSON records
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    #[command(flatten)]
    pub parser: ParserArgs,
}
