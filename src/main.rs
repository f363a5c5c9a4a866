use anyhow::{Context, Result};
use clap::{Arg, Command};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use netpulse_core::AppConfig;

mod app;

use app::Application;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("netpulse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Periodic speedtest and latency probe collector for InfluxDB")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (optional; environment overrides)")
                .default_value("config/netpulse.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Log format")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").expect("has default");
    let log_level = matches.get_one::<String>("log-level").expect("has default");
    let log_format = matches.get_one::<String>("log-format").expect("has default");

    init_logging(log_level, log_format)?;

    let config = AppConfig::load(config_path)
        .with_context(|| format!("failed to load configuration (file: {config_path})"))?;
    info!(
        namespace = %config.namespace,
        bucket = %config.influx.bucket,
        ping_targets = ?config.ping_targets,
        "netpulse starting"
    );

    Application::new(config).run().await
}

fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("failed to initialize JSON logging")?,
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("failed to initialize pretty logging")?,
    }
    Ok(())
}
