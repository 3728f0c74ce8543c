//! A3S Tag CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use a3s_tag_cli::commands::{dispatch, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.global.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive())),
        )
        .with_target(false)
        .init();

    if let Err(e) = dispatch(cli.command, &config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
