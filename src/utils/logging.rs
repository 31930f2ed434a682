//! # 日志初始化
//!
//! 解析器通过 `tracing` 记录被跳过的行和每个文件的解析摘要。
//! 默认级别为 `warn`，`-v` 提升到 `debug`，`-vv` 提升到 `trace`；
//! 设置了 `RUST_LOG` 时以环境变量为准。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`

use tracing_subscriber::EnvFilter;

/// 根据 `-v` 次数选择默认过滤级别
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// 安装全局 subscriber，输出到标准错误
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    // 测试或重复初始化时忽略失败
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
