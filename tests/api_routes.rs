use std::sync::Arc;

use airguard::{
    ai::{AiError, Completion, CompletionRequest, LanguageModel, Usage},
    api::{router, AppState},
    config::Settings,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let settings = Settings::from_lookup(|_| None).unwrap();
    router(AppState::in_memory(settings).unwrap().with_seed(7))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, Method::GET, uri, None).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = get_json(&app(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["vectorSearch"], true);
    assert_eq!(body["embeddingDimension"], 384);
}

#[tokio::test]
async fn aqi_report_carries_forecast_and_cache_headers() {
    let app = app();
    let (status, headers, bytes) = send(&app, Method::GET, "/api/aqi?city=la", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, s-maxage=300, stale-while-revalidate=600"
    );
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["city"], "LA");
    assert_eq!(body["forecast"].as_array().unwrap().len(), 24);
    assert_eq!(body["trends"]["no2"].as_array().unwrap().len(), 7);
    assert_eq!(body["dataSource"], "NASA GIBS/Worldview + NOAA");
    assert_eq!(body["dataDate"], "2025-10-05");
}

#[tokio::test]
async fn missing_city_defaults_to_new_york() {
    let (status, body) = get_json(&app(), "/api/aqi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "NYC");
    assert_eq!(body["current"]["aqi"], 58.0);
}

#[tokio::test]
async fn bad_inputs_are_rejected_with_a_json_error() {
    let app = app();
    for uri in [
        "/api/aqi?city=Atlantis",
        "/api/aqi?aqi=NaN",
        "/api/aqi?no2=lots",
        "/api/aqi?lang=de",
        "/api/aqi/category",
        "/api/aqi/category?aqi=-3",
        "/api/history?range=1y",
        "/api/export?days=0",
        "/api/openaq?lat=40.7",
        "/api/tips",
        "/api/export?city=%22x",
        "/api/export?city=NYC%0D%0AX-Injected:1",
        "/api/history?city=a%2Fb",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "invalid_input", "{uri}");
        assert!(body.get("forecast").is_none());
    }
}

#[tokio::test]
async fn overrides_drive_localised_alerts() {
    let (status, body) = get_json(&app(), "/api/aqi?city=NYC&lang=ru&no2=45&o3=10&pm25=5").await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["pollutant"], "NO2");
    assert_eq!(alerts[0]["severity"], "high");
    assert!(alerts[0]["message"].as_str().unwrap().contains("Нью-Йорке"));
}

#[tokio::test]
async fn category_lookup_returns_guidance() {
    let (status, body) = get_json(&app(), "/api/aqi/category?aqi=151").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["level"], "Unhealthy");
    assert!(!body["advisories"].as_array().unwrap().is_empty());
    assert!(!body["sensitiveGroups"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn validation_filters_by_station_name() {
    let app = app();
    let (_, all) = get_json(&app, "/api/validation?parameter=pm25").await;
    assert_eq!(all["summary"]["total"], 36);
    assert_eq!(all["pairs"][0]["satellite"]["parameter"], "pm25");

    let (_, some) = get_json(&app, "/api/validation?city=zzzz-no-station").await;
    assert_eq!(some["summary"]["total"], 0);
    assert_eq!(some["summary"]["accuracy"], 0.0);
}

#[tokio::test]
async fn history_matches_requested_range() {
    let (status, body) = get_json(&app(), "/api/history?city=chi&range=30d").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "CHI");
    assert_eq!(body["range"], "30d");
    assert_eq!(body["label"], "Last 30 Days");
    assert_eq!(body["history"].as_array().unwrap().len(), 30);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn pollutant_reference_lists_and_looks_up() {
    let app = app();
    let (status, all) = get_json(&app, "/api/pollutants").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = all.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["pm25", "pm10", "no2", "o3", "so2", "co"]);

    let (status, no2) = get_json(&app, "/api/pollutants/NO2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(no2["formula"], "NO₂");
    assert_eq!(no2["safeLevel"], "0-25 μg/m³ annual mean (WHO guideline)");

    let (status, missing) = get_json(&app, "/api/pollutants/radon").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "not_found");
}

#[tokio::test]
async fn tips_follow_the_aqi() {
    let app = app();
    let (status, clean) = get_json(&app, "/api/tips?aqi=20").await;
    assert_eq!(status, StatusCode::OK);
    let tips = clean["tips"].as_array().unwrap();
    assert_eq!(tips.len(), 3);
    assert!(tips.iter().all(|t| t["category"] == "prevention"));

    let (_, smoky) = get_json(&app, "/api/tips?aqi=220").await;
    assert_eq!(smoky["tips"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn export_is_a_csv_attachment() {
    let (status, headers, bytes) = send(&app(), Method::GET, "/api/export?city=NYC&days=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"AirGuard_Export_NYC_"));
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Date,Location,AQI,PM2.5"));
    assert!(lines[1].contains(",New York City,"));
}

#[tokio::test]
async fn alert_settings_check_and_clear() {
    let app = app();
    let (_, defaults) = get_json(&app, "/api/alerts/settings").await;
    assert_eq!(defaults, json!({"enabled": false, "threshold": 100.0, "cities": []}));

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/alerts/settings",
        Some(json!({"enabled": true, "threshold": 120, "cities": ["NYC"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, bytes) = send(&app, Method::POST, "/api/alerts/check", Some(json!({"city": "nyc", "aqi": 90}))).await;
    let quiet: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(quiet["triggered"], false);

    let (_, _, bytes) = send(&app, Method::POST, "/api/alerts/check", Some(json!({"city": "nyc", "aqi": 210}))).await;
    let fired: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fired["triggered"], true);
    assert_eq!(fired["alert"]["severity"], "very-unhealthy");
    assert_eq!(fired["alert"]["cityName"], "New York City");

    let (_, list) = get_json(&app, "/api/alerts").await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _, _) = send(&app, Method::DELETE, "/api/alerts", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = get_json(&app, "/api/alerts").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn favorites_round_trip() {
    let app = app();
    let fav = json!({"code": "LA", "name": "Los Angeles", "country": "US"});
    let (status, _, _) = send(&app, Method::POST, "/api/favorites", Some(fav.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, bytes) = send(&app, Method::POST, "/api/favorites", Some(fav)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap()["added"], false);

    let (_, list) = get_json(&app, "/api/favorites").await;
    assert_eq!(list[0]["code"], "LA");
    assert!(list[0]["addedAt"].is_string());

    let (status, _, _) = send(&app, Method::DELETE, "/api/favorites/LA", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = get_json(&app, "/api/favorites").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn openaq_without_key_degrades_to_empty_results() {
    let (status, body) = get_json(&app(), "/api/openaq?lat=40.71&lng=-74.0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["error"], "OpenAQ API key not configured");
}

#[tokio::test]
async fn ai_routes_need_a_model() {
    let (status, _, bytes) = send(
        &app(),
        Method::POST,
        "/api/ai/analyze",
        Some(json!({"pollutants": {"pm25": 12}, "location": "Denver", "aqi": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "not_configured");
}

struct Echo;

#[async_trait]
impl LanguageModel for Echo {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(Completion {
            text: format!("echo: {}", last.lines().next().unwrap_or_default()),
            tool_calls: Vec::new(),
            usage: Usage {
                input_tokens: 3,
                output_tokens: 2,
            },
        })
    }
}

#[tokio::test]
async fn ai_routes_use_the_configured_model() {
    let settings = Settings::from_lookup(|_| None).unwrap();
    let app = router(AppState::in_memory(settings).unwrap().with_model(Arc::new(Echo)));

    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/ai/analyze",
        Some(json!({"pollutants": {"pm25": 12}, "location": "Denver", "aqi": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["analysis"], "echo: Analyze this air quality data and provide health insights:");
    assert_eq!(body["usage"]["outputTokens"], 2);

    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/ai/chat",
        Some(json!({"messages": [{"role": "user", "content": "hello"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "echo: hello");
    assert_eq!(body["toolCalls"], json!([]));
}

#[tokio::test]
async fn vector_index_then_search() {
    let app = app();
    for (id, location, aqi) in [("a", "Denver", 42), ("b", "Mumbai", 180)] {
        let (status, _, bytes) = send(
            &app,
            Method::POST,
            "/api/vector/index",
            Some(json!({"id": id, "location": location, "aqi": aqi, "pollutants": {"pm25": 9}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": true, "id": id}));
    }

    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/vector/search",
        Some(json!({"location": "Denver", "aqi": 42, "pollutants": {"pm25": 9}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "a");
}

#[tokio::test]
async fn pinecone_without_credentials_is_unavailable() {
    let settings = Settings::from_lookup(|key| (key == "VECTOR_BACKEND").then(|| "pinecone".to_string())).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        data_dir: dir.path().to_path_buf(),
        ..settings
    };
    let app = router(AppState::from_settings(settings).unwrap());
    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/vector/search",
        Some(json!({"location": "Denver", "aqi": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Vector search not configured");
}
