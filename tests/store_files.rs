use std::{
    sync::{Arc, Barrier},
    thread,
};

use airguard::store::{
    alerts::{AlertHistory, AlertSettings, AlertSeverity, HISTORY_LIMIT},
    favorites::{Favorites, NewFavorite},
    JsonFileStore, KeyValueStore, MemoryStore, Namespace,
};
use chrono::{Duration, TimeZone, Utc};

fn namespace(root: &std::path::Path) -> Namespace {
    Namespace::new("airguard", Arc::new(JsonFileStore::open(root).unwrap()))
}

#[test]
fn alert_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
    {
        let history = AlertHistory::new(namespace(dir.path()));
        history
            .save_settings(&AlertSettings {
                enabled: true,
                threshold: 100.0,
                cities: vec!["NYC".into()],
            })
            .unwrap();
        assert!(history.check_threshold("LA", "Los Angeles", 180.0, now).unwrap().is_none());
        assert!(history.check_threshold("NYC", "New York City", 99.0, now).unwrap().is_none());
        let alert = history
            .check_threshold("NYC", "New York City", 160.0, now)
            .unwrap()
            .unwrap();
        assert_eq!(alert.severity, AlertSeverity::Unhealthy);
    }
    assert!(dir.path().join("airguard_alerts.json").exists());

    let reopened = AlertHistory::new(namespace(dir.path()));
    let alerts = reopened.list().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, format!("NYC-{}", now.timestamp_millis()));
    assert!(reopened.settings().unwrap().enabled);
}

#[test]
fn history_is_bounded_and_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let history = AlertHistory::new(namespace(dir.path()));
    history
        .save_settings(&AlertSettings {
            enabled: true,
            threshold: 0.0,
            cities: vec!["LA".into()],
        })
        .unwrap();
    let start = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
    for i in 0..(HISTORY_LIMIT as i64 + 5) {
        history
            .check_threshold("LA", "Los Angeles", 120.0, start + Duration::minutes(i))
            .unwrap();
    }
    let alerts = history.list().unwrap();
    assert_eq!(alerts.len(), HISTORY_LIMIT);
    assert!(alerts[0].timestamp > alerts[1].timestamp);
}

#[test]
fn stale_shapes_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("airguard_alert_settings.json"), r#"{"enabled": "yes"}"#).unwrap();
    let history = AlertHistory::new(namespace(dir.path()));
    assert_eq!(history.settings().unwrap(), AlertSettings::default());

    std::fs::write(dir.path().join("airguard_alerts.json"), "{ not json").unwrap();
    assert!(history.list().unwrap().is_empty());

    history
        .save_settings(&AlertSettings {
            enabled: true,
            threshold: 100.0,
            cities: vec!["NYC".into()],
        })
        .unwrap();
    let now = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
    history.check_threshold("NYC", "New York City", 150.0, now).unwrap();
    assert_eq!(history.list().unwrap().len(), 1);
}

#[test]
fn favorites_dedupe_by_code() {
    let dir = tempfile::tempdir().unwrap();
    let favorites = Favorites::new(namespace(dir.path()));
    let now = Utc::now();
    let nyc = || NewFavorite {
        code: "NYC".into(),
        name: "New York City".into(),
        country: "US".into(),
    };
    assert!(favorites.add(nyc(), now).unwrap());
    assert!(!favorites.add(nyc(), now).unwrap());
    assert!(favorites.is_favorite("NYC").unwrap());
    favorites.remove("NYC").unwrap();
    assert!(favorites.list().unwrap().is_empty());
}

const WRITERS: usize = 40;

fn concurrent_writes_are_all_kept(backend: Arc<dyn KeyValueStore>) {
    let ns = Namespace::new("airguard", backend);
    let history = AlertHistory::new(ns.clone());
    history
        .save_settings(&AlertSettings {
            enabled: true,
            threshold: 100.0,
            cities: vec!["NYC".into()],
        })
        .unwrap();
    let favorites = Favorites::new(ns);
    let start = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let history = history.clone();
            let favorites = favorites.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let at = start + Duration::seconds(i as i64);
                history.check_threshold("NYC", "New York City", 180.0, at).unwrap();
                let added = favorites
                    .add(
                        NewFavorite {
                            code: format!("C{i}"),
                            name: format!("City {i}"),
                            country: "US".into(),
                        },
                        at,
                    )
                    .unwrap();
                assert!(added);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(history.list().unwrap().len(), WRITERS);
    assert_eq!(favorites.list().unwrap().len(), WRITERS);
}

#[test]
fn concurrent_writers_keep_every_entry_in_memory() {
    concurrent_writes_are_all_kept(Arc::new(MemoryStore::new()));
}

#[test]
fn concurrent_writers_keep_every_entry_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    concurrent_writes_are_all_kept(Arc::new(JsonFileStore::open(dir.path()).unwrap()));
}
