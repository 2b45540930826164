//! 日志与追踪系统
//! 根据 logging 配置初始化结构化日志

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// 初始化日志与追踪系统
///
/// `RUST_LOG` 优先于配置中的日志级别。
pub fn init_telemetry(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_layer = match config.format.to_lowercase().as_str() {
        // 开发环境
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        // 生产环境
        _ => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = %config.format,
        "Telemetry initialized"
    );

    Ok(())
}
