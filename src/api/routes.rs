//! HTTP route handlers for Axum.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

use super::{
    error::{ApiError, ApiResult},
    types::*,
    AppState,
};
use crate::{
    ai::{chat, chat::AnalysisInput, vector::ConditionsRecord},
    data::{
        export,
        openaq::{LocationQuery, LocationsOutcome, DEFAULT_RADIUS_M},
    },
    engine::{
        self, category,
        cities::{self, City},
        history::{self, TimeRange},
        pollutants::{self, PollutantInfo},
        validation, AqiReport, Locale,
    },
    store::{
        alerts::{AirQualityAlert, AlertSettings},
        favorites::{FavoriteLocation, NewFavorite},
    },
};

const DEFAULT_CITY: &str = "NYC";
const DEFAULT_PARAMETER: &str = "no2";
const DEFAULT_EXPORT_DAYS: u32 = 30;
const MAX_EXPORT_DAYS: u32 = 365;
const OUTLOOK_DAYS: u32 = 7;
const MAX_CODE_LEN: usize = 32;

fn parse_number(field: &'static str, raw: Option<&str>) -> ApiResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{field} must be a number, got '{text}'"))),
    }
}

fn resolve_city(raw: Option<&str>) -> ApiResult<&'static City> {
    let input = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_CITY);
    cities::resolve(input).ok_or_else(|| {
        ApiError::bad_request(format!(
            "unknown city '{input}'; expected one of {}",
            cities::known_codes()
        ))
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        vector_search: state.vectors.is_configured(),
        embedding_dimension: state.vectors.dimension(),
    })
}

pub async fn aqi_report(
    State(state): State<AppState>,
    Query(query): Query<AqiQuery>,
) -> ApiResult<impl IntoResponse> {
    let city = resolve_city(query.city.as_deref())?;
    let locale = match query.lang.as_deref() {
        Some(lang) => lang.parse::<Locale>().map_err(ApiError::BadRequest)?,
        None => state.settings.locale,
    };

    let mut reading = city.baseline;
    let overrides: [(&'static str, &Option<String>, &mut f64); 8] = [
        ("aqi", &query.aqi, &mut reading.aqi),
        ("o3", &query.o3, &mut reading.pollutants.o3),
        ("no2", &query.no2, &mut reading.pollutants.no2),
        ("pm25", &query.pm25, &mut reading.pollutants.pm25),
        ("pm10", &query.pm10, &mut reading.pollutants.pm10),
        ("wind_speed", &query.wind_speed, &mut reading.weather.wind_speed),
        ("temperature", &query.temperature, &mut reading.weather.temperature),
        ("precipitation", &query.precipitation, &mut reading.weather.precipitation),
    ];
    for (field, raw, slot) in overrides {
        if let Some(value) = parse_number(field, raw.as_deref())? {
            *slot = value;
        }
    }

    let report: AqiReport = engine::build_report(city, &reading, locale, Utc::now(), &mut state.rng())?;
    debug!(city = city.code, alerts = report.alerts.len(), "built aqi report");

    let cache = state.settings.cache_seconds;
    let cache_control = HeaderValue::from_str(&format!(
        "public, s-maxage={cache}, stale-while-revalidate={}",
        cache * 2
    ))
    .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(report)))
}

pub async fn aqi_category(Query(query): Query<CategoryQuery>) -> ApiResult<Json<CategoryResponse>> {
    let aqi = parse_number("aqi", query.aqi.as_deref())?
        .ok_or_else(|| ApiError::bad_request("aqi is required"))?;
    if !aqi.is_finite() || aqi < 0.0 {
        return Err(ApiError::bad_request(format!("aqi must be a non-negative number, got {aqi}")));
    }
    Ok(Json(category::guidance(aqi.round() as u32)))
}

pub async fn list_pollutants() -> Json<&'static [PollutantInfo]> {
    Json(&pollutants::POLLUTANTS[..])
}

pub async fn pollutant(Path(id): Path<String>) -> ApiResult<Json<&'static PollutantInfo>> {
    pollutants::pollutant_info(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("unknown pollutant '{id}'")))
}

pub async fn health_tips(Query(query): Query<TipsQuery>) -> ApiResult<Json<TipsResponse>> {
    let aqi = parse_number("aqi", query.aqi.as_deref())?
        .ok_or_else(|| ApiError::bad_request("aqi is required"))?;
    if !aqi.is_finite() || aqi < 0.0 {
        return Err(ApiError::bad_request(format!("aqi must be a non-negative number, got {aqi}")));
    }
    Ok(Json(TipsResponse {
        aqi,
        tips: pollutants::tips_for_aqi(aqi),
    }))
}

pub async fn validation_pairs(
    State(state): State<AppState>,
    Query(query): Query<ValidationQuery>,
) -> Json<ValidationResponse> {
    let parameter = query
        .parameter
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PARAMETER.to_string());
    let mut pairs = validation::generate_pairs(&parameter, Utc::now(), &mut state.rng());
    if let Some(needle) = query.city.map(|c| c.to_lowercase()).filter(|c| !c.is_empty()) {
        pairs.retain(|p| {
            p.ground_station
                .station_name
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
    }
    let summary = validation::summarize(&pairs);
    Json(ValidationResponse {
        parameter,
        pairs,
        summary,
    })
}

/// Free-form city code for the synthetic history; it ends up in file names
/// and headers, so only `[A-Z0-9_-]` is accepted.
fn history_code(raw: Option<&str>) -> ApiResult<String> {
    let code = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CITY)
        .to_ascii_uppercase();
    if code.len() > MAX_CODE_LEN
        || !code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
    {
        return Err(ApiError::bad_request(format!(
            "city code may only contain letters, digits, '_' and '-' (at most {MAX_CODE_LEN}), got '{code}'"
        )));
    }
    Ok(code)
}

pub async fn history_series(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse::<TimeRange>().map_err(ApiError::BadRequest)?,
        None => TimeRange::Week,
    };
    let city = history_code(query.city.as_deref())?;
    let today = Utc::now().date_naive();
    let mut rng = state.rng();
    let points = history::generate_historical(&city, range.days(), today, &mut rng);
    let latest = points.last().map_or(0.0, |p| f64::from(p.aqi));
    let forecast = history::generate_daily_forecast(latest, OUTLOOK_DAYS, today, &mut rng);
    Ok(Json(HistoryResponse {
        city,
        range,
        label: range.label(),
        history: points,
        forecast,
    }))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<impl IntoResponse> {
    let days = match parse_number("days", query.days.as_deref())? {
        None => DEFAULT_EXPORT_DAYS,
        Some(d) if d.fract() == 0.0 && (1.0..=f64::from(MAX_EXPORT_DAYS)).contains(&d) => d as u32,
        Some(d) => {
            return Err(ApiError::bad_request(format!(
                "days must be a whole number between 1 and {MAX_EXPORT_DAYS}, got {d}"
            )))
        }
    };
    let code = history_code(query.city.as_deref())?;
    let location = cities::resolve(&code).map_or(code.as_str(), |c| c.name);
    let today = Utc::now().date_naive();
    let points = history::generate_historical(&code, days, today, &mut state.rng());
    let body = export::to_csv_string(location, &points)?;

    let disposition = format!("attachment; filename=\"{}\"", export::export_filename(&code, today));
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
    ];
    Ok((headers, body))
}

pub async fn alert_settings(State(state): State<AppState>) -> ApiResult<Json<AlertSettings>> {
    Ok(Json(state.alerts.settings()?))
}

pub async fn save_alert_settings(
    State(state): State<AppState>,
    Json(settings): Json<AlertSettings>,
) -> ApiResult<Json<AlertSettings>> {
    if !settings.threshold.is_finite() || settings.threshold < 0.0 {
        return Err(ApiError::bad_request("threshold must be a non-negative number"));
    }
    state.alerts.save_settings(&settings)?;
    info!(enabled = settings.enabled, threshold = settings.threshold, "alert settings saved");
    Ok(Json(settings))
}

pub async fn list_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<AirQualityAlert>>> {
    Ok(Json(state.alerts.list()?))
}

pub async fn clear_alerts(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.alerts.clear()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_alert(
    State(state): State<AppState>,
    Json(request): Json<AlertCheckRequest>,
) -> ApiResult<Json<AlertCheckResponse>> {
    if !request.aqi.is_finite() {
        return Err(ApiError::bad_request("aqi must be a finite number"));
    }
    let (code, name) = match cities::resolve(&request.city) {
        Some(city) => (city.code.to_string(), city.name.to_string()),
        None => (request.city.clone(), request.city.clone()),
    };
    let alert = state.alerts.check_threshold(&code, &name, request.aqi, Utc::now())?;
    Ok(Json(AlertCheckResponse {
        triggered: alert.is_some(),
        alert,
    }))
}

pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<Json<Vec<FavoriteLocation>>> {
    Ok(Json(state.favorites.list()?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Json(location): Json<NewFavorite>,
) -> ApiResult<(StatusCode, Json<FavoriteAdded>)> {
    if location.code.trim().is_empty() {
        return Err(ApiError::bad_request("code is required"));
    }
    let added = state.favorites.add(location, Utc::now())?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(FavoriteAdded { added })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<StatusCode> {
    state.favorites.remove(&code)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn openaq_locations(
    State(state): State<AppState>,
    Query(query): Query<OpenAqQuery>,
) -> ApiResult<Json<LocationsOutcome>> {
    let (Some(lat), Some(lng)) = (
        parse_number("lat", query.lat.as_deref())?,
        parse_number("lng", query.lng.as_deref())?,
    ) else {
        return Err(ApiError::bad_request("Latitude and longitude are required"));
    };
    if !lat.is_finite() || !lng.is_finite() {
        return Err(ApiError::bad_request("lat and lng must be finite"));
    }
    let radius_m = match parse_number("radius", query.radius.as_deref())? {
        None => DEFAULT_RADIUS_M,
        Some(r) if r.is_finite() && r > 0.0 => r.round() as u32,
        Some(r) => return Err(ApiError::bad_request(format!("radius must be positive, got {r}"))),
    };
    let outcome = state.openaq.locations(LocationQuery { lat, lng, radius_m }).await;
    if outcome.is_degraded() {
        debug!(error = ?outcome.error, "openaq returned the empty fallback");
    }
    Ok(Json(outcome))
}

pub async fn ai_analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalysisInput>,
) -> ApiResult<Json<chat::Analysis>> {
    if !input.aqi.is_finite() {
        return Err(ApiError::bad_request("aqi must be a finite number"));
    }
    Ok(Json(chat::analyze(state.model.as_ref(), &input).await?))
}

pub async fn ai_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if request.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }
    Ok(Json(chat::chat(state.model.as_ref(), &state.tools, request.messages).await?))
}

pub async fn vector_index(
    State(state): State<AppState>,
    Json(record): Json<ConditionsRecord>,
) -> ApiResult<Json<IndexResponse>> {
    let id = state.vectors.index_record(&record, Utc::now()).await?;
    Ok(Json(IndexResponse { success: true, id }))
}

pub async fn vector_search(
    State(state): State<AppState>,
    Json(record): Json<ConditionsRecord>,
) -> ApiResult<Json<SearchResponse>> {
    let results = state.vectors.search(&record).await?;
    Ok(Json(SearchResponse { results }))
}
