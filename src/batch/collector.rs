//! # 文件收集器
//!
//! 根据输入路径和模式收集待解析的 Gaussian 文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔的多模式）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs`, `commands/summary.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{PatrolError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配的 Gaussian 文件
pub const DEFAULT_PATTERNS: &str = "*.log,*.out,*.gjf,*.com,*.fchk,*.fch,*.chk";

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    PatrolError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 检查输入是否为单文件
    pub fn is_single_file(&self) -> bool {
        self.input.is_file()
    }

    /// 收集文件（单文件输入不做模式过滤）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.is_single_file() {
            return Ok(vec![self.input.clone()]);
        }
        if !self.input.is_dir() {
            return Err(PatrolError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let walker = if self.recursive {
            WalkDir::new(&self.input)
        } else {
            WalkDir::new(&self.input).max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    /// 检查文件是否匹配任一模式；没有模式时全部匹配
    fn matches_patterns(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(filename))
    }
}
