use std::path::PathBuf;

use clap::Parser;

use atlas_rs::config::{ConfigLoader, Settings};
use atlas_rs::server::Server;

/// Places-sharing backend.
#[derive(Debug, Parser)]
#[command(name = "atlas-rs", version, about)]
struct Cli {
    /// Load a single configuration file instead of the layered config/
    /// directory.
    #[arg(long, value_name = "FILE", env = "ATLAS_CONFIG_FILE")]
    config: Option<PathBuf>,
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.logger.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.logger.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = ConfigLoader::with_config_file(cli.config).load()?;
    init_tracing(&settings);

    Server::new(settings).run().await
}
