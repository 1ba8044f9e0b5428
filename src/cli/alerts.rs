//! CLI entry-point for the persisted alert history.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args as ClapArgs, Subcommand};
use tracing::{info, instrument};

use crate::{
    api::STORE_NAMESPACE,
    config::Settings,
    store::{alerts::AlertHistory, JsonFileStore, Namespace},
};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Print recorded alerts, newest first.
    List,
    /// Remove every recorded alert.
    Clear,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let store = JsonFileStore::open(settings.join_data("store"))?;
    let history = AlertHistory::new(Namespace::new(STORE_NAMESPACE, Arc::new(store)));
    match args.action {
        Action::List => {
            let alerts = history.list()?;
            println!("{}", serde_json::to_string_pretty(&alerts)?);
        }
        Action::Clear => {
            history.clear()?;
            info!("alert history cleared");
        }
    }
    Ok(())
}
