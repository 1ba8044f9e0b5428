//! Spreadsheet-friendly CSV export of daily history.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::history::HistoricalPoint;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "AQI")]
    aqi: u32,
    #[serde(rename = "PM2.5 (µg/m³)")]
    pm25: u32,
    #[serde(rename = "PM10 (µg/m³)")]
    pm10: u32,
    #[serde(rename = "NO2 (µg/m³)")]
    no2: u32,
    #[serde(rename = "O3 (µg/m³)")]
    o3: u32,
    #[serde(rename = "SO2 (µg/m³)")]
    so2: u32,
}

/// Write a header row plus one row per point.
pub fn write_csv<W: Write>(sink: W, location: &str, points: &[HistoricalPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for p in points {
        writer.serialize(ExportRow {
            date: p.date,
            location,
            aqi: p.aqi,
            pm25: p.pm25,
            pm10: p.pm10,
            no2: p.no2,
            o3: p.o3,
            so2: p.so2,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(location: &str, points: &[HistoricalPoint]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, location, points)?;
    Ok(String::from_utf8(buf)?)
}

pub fn export_filename(city_code: &str, date: NaiveDate) -> String {
    format!("AirGuard_Export_{city_code}_{date}.csv")
}
