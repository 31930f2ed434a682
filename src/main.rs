//! # parse-patrol - Gaussian 输出文件解析工具
//!
//! 从 Gaussian 计算日志、输入文件和格式化检查点中提取结构、能量与
//! 振动数据，统一输出为 JSON 记录。
//!
//! ## 子命令
//! - `parse`   - 解析单个文件
//! - `batch`   - 批量解析并为每个文件写出 JSON
//! - `summary` - 批量解析并打印能量/频率汇总表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (log / gjf / fchk 解析器)
//!   │     ├── batch/     (文件收集与并行执行)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
