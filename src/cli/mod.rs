//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `parse`: 解析单个 Gaussian 文件并输出 JSON
//! - `batch`: 批量解析目录中的文件，每个文件写出一个 JSON
//! - `summary`: 批量解析并打印能量/频率汇总表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: parse, batch, summary

pub mod batch;
pub mod parse;
pub mod summary;

use crate::parsers::ParseOptions;
use clap::{Args, Parser, Subcommand};

/// parse-patrol - Gaussian 输出文件解析工具
#[derive(Parser)]
#[command(name = "parse-patrol")]
#[command(version)]
#[command(about = "Extract structured data from Gaussian log, input and formatted checkpoint files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Parse one Gaussian file and print the record as JSON
    Parse(parse::ParseArgs),

    /// Parse every matching file under a directory into per-file JSON records
    Batch(batch::BatchArgs),

    /// Parse files and print a table of energies and frequencies
    Summary(summary::SummaryArgs),
}

/// 各子命令共享的解析器参数
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Geometry labels in input decks to treat as lattice vectors (comma-separated)
    #[arg(
        long,
        env = "PATROL_LATTICE_LABELS",
        value_delimiter = ',',
        default_value = "Tv,Tv1,Tv2,Tv3,Tv4,Tv5,Tv6"
    )]
    pub lattice_labels: Vec<String>,
}

impl ParserArgs {
    pub fn to_options(&self) -> ParseOptions {
        ParseOptions::with_lattice_labels(&self.lattice_labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommand_with_labels() {
        let cli = Cli::try_parse_from([
            "parse-patrol",
            "-vv",
            "parse",
            "job.gjf",
            "--lattice-labels",
            "Tv,Lv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Parse(args) => {
                let opts = args.parser.to_options();
                assert!(opts.is_lattice_label("Lv"));
                assert!(!opts.is_lattice_label("Tv1"));
            }
            _ => panic!("expected parse subcommand"),
        }
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::try_parse_from(["parse-patrol", "batch", "runs"]).unwrap();
        match cli.command {
            Commands::Batch(args) => {
                assert_eq!(args.output_dir, std::path::PathBuf::from("parsed"));
                assert!(!args.overwrite);
                assert!(args.parser.to_options().is_lattice_label("Tv"));
            }
            _ => panic!("expected batch subcommand"),
        }
    }
}
