use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use taskhub_server::{
    initialize_app, init_telemetry, shutdown_signal,
    telemetry::{log_shutdown_info, log_startup_info, report_error},
    CliOverrides, Config,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "taskhub")]
#[command(about = "TaskHub personal task management server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Listen address override
    #[arg(long)]
    listen_addr: Option<String>,

    /// Port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level override
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            database_url: self.database_url.clone(),
            listen_addr: self.listen_addr.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());
    config.validate()?;
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    log_startup_info(&config);

    let router = initialize_app(&config)
        .await
        .context("Failed to initialize application")?;

    let addr: SocketAddr = config
        .server_address()
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.server_address()))?;

    http_api::serve(router, addr, shutdown_signal())
        .await
        .with_context(|| format!("HTTP server on {addr} failed"))?;

    log_shutdown_info();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli).context("Failed to load configuration")?;

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;
    info!(config_file = ?cli.config, "Configuration loaded");

    if let Err(e) = run(config).await {
        report_error(&e, "server");
        std::process::exit(1);
    }

    Ok(())
}
