// handlers/protected/airports.rs - /api/v1/airports[/:icao]
//
// Airports are addressed by ICAO code; the path segment is matched
// case-insensitively (`/airports/ksvn` finds KSVN).

use axum::{extract::State, Extension};

use crate::database::models::{Airport, AirportPayload};
use crate::database::DatabaseError;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Airport>> {
    let airports = state.airports.select_any(&user.owner()).await?;
    Ok(ApiResponse::success(airports))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AirportPayload>,
) -> ApiResult<Airport> {
    let new = payload.into_new()?;
    let airport = state.airports.insert(&user.owner(), new).await?;
    Ok(ApiResponse::created(airport))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(icao): ApiPath<String>,
) -> ApiResult<Airport> {
    let airport = state
        .airports
        .select_404(&user.owner(), &icao.to_uppercase())
        .await?;
    Ok(ApiResponse::success(airport))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(icao): ApiPath<String>,
    ApiJson(payload): ApiJson<AirportPayload>,
) -> ApiResult<Airport> {
    let patch = payload.into_patch()?;
    let airport = state
        .airports
        .update(&user.owner(), &icao.to_uppercase(), patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<Airport>)?;
    Ok(ApiResponse::success(airport))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(icao): ApiPath<String>,
) -> ApiResult<()> {
    if !state.airports.delete(&user.owner(), &icao.to_uppercase()).await? {
        return Err(DatabaseError::not_found::<Airport>().into());
    }
    Ok(ApiResponse::no_content())
}
