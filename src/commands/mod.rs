//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `batch/`, `utils/`
//! - 子模块: parse, batch, summary

pub mod batch;
pub mod parse;
pub mod summary;

use crate::cli::Commands;
use crate::error::Result;
use crate::models::ParsedCalculation;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Parse(args) => parse::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Summary(args) => summary::execute(args),
    }
}

/// 序列化解析记录
pub(crate) fn to_json(record: &ParsedCalculation, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(record)?
    } else {
        serde_json::to_string_pretty(record)?
    };
    Ok(json)
}
