//! CRM Docs - quote document command line
//!
//! Exports quotes through the company's template and manages the custom and
//! default templates stored in the data directory.

mod cli;
mod commands;
mod state;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    tracing::info!(data_dir = ?config.data_dir, tenant = %config.tenant, "Starting crm-docs");

    let mut state = AppState::load(config).await;

    let output = match cli.command {
        Commands::Export { quote, out_dir } => commands::export(&state, &quote, out_dir)?,
        Commands::Preview { quote, template } => {
            commands::preview(&state, &quote, template.as_deref())?
        }
        Commands::SetTemplate { template } => commands::set_template(&mut state, &template)?,
        Commands::ClearTemplate => commands::clear_template(&mut state)?,
        Commands::Placeholders { template } => {
            commands::placeholders(&state, template.as_deref())?
        }
        Commands::SetDefault { choice } => {
            commands::set_default_template(&mut state, &choice).await?
        }
    };

    println!("{}", output);
    Ok(())
}
