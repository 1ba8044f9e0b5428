//! Command-line interface wiring for airguard.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod alerts;
pub mod category;
pub mod export;
pub mod report;
pub mod serve;
pub mod validate;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Air-quality forecasts, alerts and health advisories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Report(args) => report::run(args, settings).await,
            Commands::Category(args) => category::run(args).await,
            Commands::Validate(args) => validate::run(args).await,
            Commands::Export(args) => export::run(args, settings).await,
            Commands::Alerts(args) => alerts::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Print the forecast, trends and alerts for a city.
    Report(report::Args),
    /// Look up the category and advisories for an AQI value.
    Category(category::Args),
    /// Compare simulated satellite values against ground stations.
    Validate(validate::Args),
    /// Write synthesized daily history as CSV.
    Export(export::Args),
    /// Inspect or clear the persisted alert history.
    Alerts(alerts::Args),
}
