//! CLI entry-point for the category and advisory lookup.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::engine::category;

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// AQI value to look up.
    #[arg(long)]
    pub aqi: u32,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let guidance = category::guidance(args.aqi);
    println!("{}", serde_json::to_string_pretty(&guidance)?);
    Ok(())
}
