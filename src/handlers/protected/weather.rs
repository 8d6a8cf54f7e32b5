// handlers/protected/weather.rs - geocoding, METAR and TAF proxy endpoints
//
// Thin wrappers over WeatherService. Path segments arrive as strings so
// that a malformed coordinate becomes a 400 field error instead of a 404.

use std::collections::BTreeMap;

use axum::extract::State;
use serde_json::Value;

use crate::middleware::{ApiPath, ApiResponse, ApiResult};
use crate::services::weather_service::{parse_coordinate, Coordinates};
use crate::services::ReportKind;
use crate::state::AppState;

/// GET /api/v1/coordinates/city/:city/country/:country_code
pub async fn coordinates(
    State(state): State<AppState>,
    ApiPath((city, country_code)): ApiPath<(String, String)>,
) -> ApiResult<Coordinates> {
    let coords = state.weather.coordinates(&city, &country_code).await?;
    Ok(ApiResponse::success(coords))
}

pub async fn metars_by_airport(
    State(state): State<AppState>,
    ApiPath(codes): ApiPath<String>,
) -> ApiResult<BTreeMap<String, Value>> {
    station_reports(&state, ReportKind::Metar, &codes).await
}

pub async fn tafs_by_airport(
    State(state): State<AppState>,
    ApiPath(codes): ApiPath<String>,
) -> ApiResult<BTreeMap<String, Value>> {
    station_reports(&state, ReportKind::Taf, &codes).await
}

pub async fn metar_by_location(
    State(state): State<AppState>,
    ApiPath((lat, lon)): ApiPath<(String, String)>,
) -> ApiResult<Value> {
    nearest_report(&state, ReportKind::Metar, &lat, &lon).await
}

pub async fn taf_by_location(
    State(state): State<AppState>,
    ApiPath((lat, lon)): ApiPath<(String, String)>,
) -> ApiResult<Value> {
    nearest_report(&state, ReportKind::Taf, &lat, &lon).await
}

async fn station_reports(
    state: &AppState,
    kind: ReportKind,
    codes: &str,
) -> ApiResult<BTreeMap<String, Value>> {
    let reports = state.weather.station_reports(kind, codes).await?;
    Ok(ApiResponse::success(reports))
}

async fn nearest_report(
    state: &AppState,
    kind: ReportKind,
    lat: &str,
    lon: &str,
) -> ApiResult<Value> {
    let latitude = parse_coordinate("latitude", lat)?;
    let longitude = parse_coordinate("longitude", lon)?;
    let report = state.weather.nearest_report(kind, latitude, longitude).await?;
    Ok(ApiResponse::success(report))
}
