//! Binary for the AI conductor bot.

use anyhow::Result;
use clap::Parser;
use conductor_bot::{load_config, run_bot, Cli, Commands};
use conductor_core::init_tracing;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = match load_config(token) {
                Ok(config) => config,
                Err(e) => {
                    let _ = init_tracing(None);
                    error!(error = %e, "Cannot start bot");
                    std::process::exit(1);
                }
            };
            run_bot(config).await
        }
    }
}
