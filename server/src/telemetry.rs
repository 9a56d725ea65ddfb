use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Build the level filter: `RUST_LOG` wins over the configured level
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")
}

/// Initialize the tracing subscriber for logging
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let registry = Registry::default().with(env_filter(config)?);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_list(true)
                .flatten_event(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer().compact().with_target(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Log server startup information
pub fn log_startup_info(config: &Config) {
    tracing::info!(
        server_address = %config.server_address(),
        database_url = %config.database.url,
        environment = %config.server.environment,
        max_connections = config.database.max_connections,
        request_timeout_secs = config.server.request_timeout_secs,
        operation_timeout_secs = config.server.operation_timeout_secs,
        "TaskHub server starting up"
    );
}

/// Log server shutdown information
pub fn log_shutdown_info() {
    tracing::info!("TaskHub server shut down gracefully");
}

/// Log an error together with its cause chain
pub fn report_error(error: &anyhow::Error, context: &str) {
    tracing::error!(error = %error, context = context, "Operation failed");

    for (depth, cause) in error.chain().skip(1).enumerate() {
        tracing::error!(error = %cause, depth = depth + 1, "Error cause");
    }
}
