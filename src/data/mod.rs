//! Outbound air-quality data providers.

pub mod export;
pub mod openaq;
