mod cli;
mod commands;
mod context;

use anyhow::{Context, Result};
use clap::Parser;
use fleet_shared::telemetry::init_telemetry;
use fleet_shared::AppConfig;
use tracing::info;

use crate::cli::Cli;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_telemetry(&config.logging)?;

    info!("{} starting (env: {})", config.app.name, config.app.env);

    let ctx = AppContext::from_config(config)?;
    let output = commands::run(&ctx, cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
