//! # summary 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/summary.rs`

use super::ParserArgs;
use crate::batch::collector::DEFAULT_PATTERNS;
use clap::Args;
use std::path::PathBuf;

/// summary 子命令参数
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// File patterns to match (comma-separated)
    #[arg(short, long, default_value = DEFAULT_PATTERNS)]
    pub pattern: String,

    /// Search subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Also write the table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, env = "PATROL_JOBS", default_value_t = 0)]
    pub jobs: usize,

    #[command(flatten)]
    pub parser: ParserArgs,
}
