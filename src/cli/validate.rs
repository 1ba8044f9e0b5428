//! CLI entry-point for satellite versus ground validation.

use anyhow::Result;
use chrono::Utc;
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::{info, instrument};

use crate::engine::{random::StdRandom, validation};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Pollutant parameter label, e.g. no2 or pm25.
    #[arg(long, default_value = "no2")]
    pub parameter: String,
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let mut rng = StdRandom::maybe_seeded(args.seed);
    let pairs = validation::generate_pairs(&args.parameter, Utc::now(), &mut rng);
    let summary = validation::summarize(&pairs);
    info!(total = summary.total, accuracy = summary.accuracy, "validation complete");
    let out = json!({ "parameter": args.parameter, "pairs": pairs, "summary": summary });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
