// handlers/protected/named_locations.rs - /api/v1/named-locations[/:city]
//
// Looked up by city name, case-insensitively. When a user has saved the
// same city twice the oldest entry wins.

use axum::{extract::State, Extension};

use crate::database::models::{NamedLocation, NamedLocationPayload};
use crate::database::DatabaseError;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<NamedLocation>> {
    let locations = state.named_locations.select_any(&user.owner()).await?;
    Ok(ApiResponse::success(locations))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NamedLocationPayload>,
) -> ApiResult<NamedLocation> {
    let new = payload.into_new()?;
    let location = state.named_locations.insert(&user.owner(), new).await?;
    Ok(ApiResponse::created(location))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(city): ApiPath<String>,
) -> ApiResult<NamedLocation> {
    let location = state.named_locations.select_404(&user.owner(), &city).await?;
    Ok(ApiResponse::success(location))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(city): ApiPath<String>,
    ApiJson(payload): ApiJson<NamedLocationPayload>,
) -> ApiResult<NamedLocation> {
    let patch = payload.into_patch()?;
    let location = state
        .named_locations
        .update(&user.owner(), &city, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<NamedLocation>)?;
    Ok(ApiResponse::success(location))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(city): ApiPath<String>,
) -> ApiResult<()> {
    if !state.named_locations.delete(&user.owner(), &city).await? {
        return Err(DatabaseError::not_found::<NamedLocation>().into());
    }
    Ok(ApiResponse::no_content())
}
