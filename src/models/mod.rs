//! # 数据模型模块
//!
//! 定义统一的 Gaussian 解析结果数据模型和元素周期表。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: calculation, element

pub mod calculation;
pub mod element;

pub use calculation::{ParsedCalculation, ParserKind};
