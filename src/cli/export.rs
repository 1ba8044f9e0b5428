//! CLI entry-point for exporting daily history as CSV.

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::export,
    engine::{cities, history, random::StdRandom},
};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// City code; unknown codes use the generic baseline.
    #[arg(long, default_value = "NYC")]
    pub city: String,
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: u32,
    /// Output path; defaults to the dated export name under the data dir.
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let code = args.city.trim().to_ascii_uppercase();
    let location = cities::resolve(&code).map_or(code.as_str(), |c| c.name);
    let today = Utc::now().date_naive();
    let mut rng = StdRandom::maybe_seeded(args.seed);
    let points = history::generate_historical(&code, args.days, today, &mut rng);

    let out = args
        .out
        .unwrap_or_else(|| settings.join_data(export::export_filename(&code, today)));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    export::write_csv(BufWriter::new(file), location, &points)?;
    info!(path = %out.display(), rows = points.len(), "wrote export");
    Ok(())
}
