// src/logging/logger.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// 初始化全局 tracing 日志
///
/// - 文件日志：`{log_dir}/{file_name}.YYYY-MM-DD-HH`，按小时滚动，JSON 格式
/// - 控制台日志：只输出 WARN 及以上，避免干扰 demo 的正常输出
///
/// 返回的 guard 必须保持存活到进程结束，否则缓冲中的日志会丢失。
pub fn init_tracing(log_dir: &str, file_name: &str) -> Result<WorkerGuard, String> {
    let log_file = rolling::hourly(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().json().with_writer(non_blocking))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::WARN),
        );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Unable to set global tracing subscriber: {}", e))?;
    Ok(guard)
}
