//! Seven-day backward trend series anchored to the current reading.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::{forecast::round_tenth, random::RandomSource};

pub const TREND_DAYS: u64 = 7;

pub const NO2_FLOOR: f64 = 5.0;
pub const PM25_FLOOR: f64 = 3.0;
pub const O3_FLOOR: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub no2: Vec<TrendPoint>,
    pub pm25: Vec<TrendPoint>,
    pub o3: Vec<TrendPoint>,
}

/// Oldest to newest: `today - 6` through `today`.
pub fn synthesize<R: RandomSource + ?Sized>(
    current_no2: f64,
    current_pm25: f64,
    current_o3: f64,
    today: NaiveDate,
    rng: &mut R,
) -> TrendSeries {
    let capacity = TREND_DAYS as usize;
    let mut series = TrendSeries {
        no2: Vec::with_capacity(capacity),
        pm25: Vec::with_capacity(capacity),
        o3: Vec::with_capacity(capacity),
    };

    for back in (0..TREND_DAYS).rev() {
        let date = today - Days::new(back);
        let i = back as f64;
        let day_factor = (7.0 - i) / 7.0;

        let no2 = (current_no2 * (0.7 + day_factor * 0.3 + rng.jitter(0.15))).round();
        let pm25 = round_tenth(current_pm25 * (0.6 + rng.next_unit() * 0.6));
        let o3 = (current_o3 * (0.8 + (i / 2.0).sin() * 0.3 + rng.jitter(0.15))).round();

        series.no2.push(TrendPoint {
            date,
            value: no2.max(NO2_FLOOR),
        });
        series.pm25.push(TrendPoint {
            date,
            value: pm25.max(PM25_FLOOR),
        });
        series.o3.push(TrendPoint {
            date,
            value: o3.max(O3_FLOOR),
        });
    }

    series
}
