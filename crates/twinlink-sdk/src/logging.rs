//! 日志初始化
//!
//! 安装 `tracing-subscriber` 的 fmt 输出，并把 `log` crate 的记录桥接到 tracing。
//! 过滤规则优先读取 `RUST_LOG`，未设置时使用传入的默认指令。

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// 日志初始化失败
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Invalid filter directives: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),

    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 使用默认过滤规则初始化日志
pub fn init_logger() -> Result<(), LoggerInitError> {
    init_logger_with_filter("twinlink_control=info,twinlink_sdk=info")
}

/// 使用指定的默认过滤规则初始化日志
///
/// 只能成功调用一次；重复调用返回错误。
pub fn init_logger_with_filter(default_directives: &str) -> Result<(), LoggerInitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives)?,
    };

    LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
