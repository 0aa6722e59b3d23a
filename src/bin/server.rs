use clap::Parser;

use vsmt_checks::config::{AppConfig, Args};
use vsmt_checks::server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = AppConfig::load(&args)?;

    // RUST_LOG wins; otherwise fall back to the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.monitoring.log_level)),
        )
        .init();

    Server::new(config)?.start().await?;
    Ok(())
}
