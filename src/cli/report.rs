//! CLI entry-point for printing a city report.

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    engine::{self, cities, random::StdRandom, Locale},
};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// City code or name.
    #[arg(long, default_value = "NYC")]
    pub city: String,
    /// Language for alert messages; defaults to AIRGUARD_LOCALE.
    #[arg(long)]
    pub lang: Option<Locale>,
    /// Seed for reproducible jitter.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let city = cities::resolve(&args.city).ok_or_else(|| {
        anyhow!("unknown city '{}'; expected one of {}", args.city, cities::known_codes())
    })?;
    let locale = args.lang.unwrap_or(settings.locale);
    let mut rng = StdRandom::maybe_seeded(args.seed);
    let report = engine::build_report(city, &city.baseline, locale, Utc::now(), &mut rng)?;
    info!(city = city.code, alerts = report.alerts.len(), "report ready");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
