//! Air-quality forecasting, alerting and advisory service.

pub mod ai;
pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod logging;
pub mod store;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
