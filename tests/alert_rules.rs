use airguard::engine::{
    alerts::{classify, Severity},
    build_report, cities,
    forecast::ForecastPoint,
    random::ConstantRandom,
    Locale, Pollutants, Reading,
};
use chrono::{DateTime, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap()
}

fn flat_forecast(aqi: f64) -> Vec<ForecastPoint> {
    (0..24)
        .map(|hour| ForecastPoint {
            hour,
            aqi,
            o3: 0.0,
            no2: 0.0,
            pm25: 0.0,
            timestamp: now(),
        })
        .collect()
}

fn pollutants(no2: f64, o3: f64, pm25: f64) -> Pollutants {
    Pollutants {
        pm25,
        pm10: 0.0,
        o3,
        no2,
    }
}

#[test]
fn unhealthy_reading_raises_no2_and_forecast_alerts_only() {
    let reading = Reading {
        aqi: 200.0,
        pollutants: pollutants(45.0, 50.0, 10.0),
        weather: cities::NYC.baseline.weather,
    };
    let report = build_report(&cities::NYC, &reading, Locale::En, now(), &mut ConstantRandom::neutral()).unwrap();
    let fired: Vec<(&str, Severity)> = report.alerts.iter().map(|a| (a.pollutant, a.severity)).collect();
    assert_eq!(fired, vec![("NO2", Severity::High), ("AQI", Severity::High)]);
}

#[test]
fn thresholds_are_strict() {
    let cases = [
        (pollutants(25.0, 70.0, 15.0), 150.0, vec![]),
        (pollutants(25.1, 0.0, 0.0), 0.0, vec![("NO2", Severity::Moderate)]),
        (pollutants(0.0, 100.5, 0.0), 0.0, vec![("O3", Severity::High)]),
        (pollutants(0.0, 0.0, 35.0), 0.0, vec![("PM2.5", Severity::Moderate)]),
        (pollutants(0.0, 0.0, 0.0), 151.0, vec![("AQI", Severity::High)]),
    ];
    for (p, peak, expected) in cases {
        let alerts = classify(&p, &flat_forecast(peak), "Testville", Locale::En, now());
        let fired: Vec<(&str, Severity)> = alerts.iter().map(|a| (a.pollutant, a.severity)).collect();
        assert_eq!(fired, expected, "pollutants {p:?} peak {peak}");
    }
}

#[test]
fn messages_follow_the_locale() {
    let p = pollutants(45.0, 0.0, 0.0);
    let en = classify(&p, &[], cities::LA.display_name(Locale::En), Locale::En, now());
    let ru = classify(&p, &[], cities::LA.display_name(Locale::Ru), Locale::Ru, now());
    assert!(en[0].message.contains("Los Angeles"));
    assert!(en[0].message.contains("45"));
    assert!(ru[0].message.contains("Лос-Анджелесе"));
    assert_ne!(en[0].message, ru[0].message);
}

#[test]
fn non_finite_input_is_rejected() {
    let mut reading = cities::NYC.baseline;
    reading.pollutants.o3 = f64::INFINITY;
    let err = build_report(&cities::NYC, &reading, Locale::En, now(), &mut ConstantRandom::neutral());
    assert!(err.is_err());
}

#[test]
fn constant_source_gives_identical_reports() {
    let render = || {
        let report = build_report(
            &cities::LA,
            &cities::LA.baseline,
            Locale::En,
            now(),
            &mut ConstantRandom(0.25),
        )
        .unwrap();
        serde_json::to_string(&report).unwrap()
    };
    assert_eq!(render(), render());
}
