//! # 统一错误处理模块
//!
//! 定义 parse-patrol 的所有错误类型，使用 `thiserror` 派生。
//!
//! 行级别的解析问题不会变成错误：解析器把它们记录到
//! `ParsedCalculation::warnings` 中并继续扫描。这里只保留需要
//! 调用方区分处理的失败（文件缺失、读写失败、参数错误等）。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// parse-patrol 统一错误类型
#[derive(Error, Debug)]
pub enum PatrolError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid numeric token: '{token}'")]
    InvalidNumber { token: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PatrolError>;
