// handlers/protected/hazards.rs - /api/v1/flights/:flight_id/briefs/:brief_id/hazards[/:hazard_id]

use axum::{extract::State, Extension};

use crate::database::models::{Brief, Hazard, HazardPayload};
use crate::database::{BriefScope, DatabaseError};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

async fn brief_scope(
    state: &AppState,
    user: &AuthUser,
    flight_id: i64,
    brief_id: i64,
) -> Result<BriefScope, DatabaseError> {
    let flight = user.owner().flight(flight_id);
    let brief: Brief = state.briefs.select_404(&flight, &brief_id).await?;
    Ok(flight.brief(brief.id))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Vec<Hazard>> {
    let scope = brief_scope(&state, &user, flight_id, brief_id).await?;
    Ok(ApiResponse::success(state.hazards.select_any(&scope).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<HazardPayload>,
) -> ApiResult<Hazard> {
    let scope = brief_scope(&state, &user, flight_id, brief_id).await?;
    let new = payload.into_new()?;
    let hazard = state.hazards.insert(&scope, new).await?;
    Ok(ApiResponse::created(hazard))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id, hazard_id)): ApiPath<(i64, i64, i64)>,
) -> ApiResult<Hazard> {
    let scope = user.owner().flight(flight_id).brief(brief_id);
    Ok(ApiResponse::success(state.hazards.select_404(&scope, &hazard_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id, hazard_id)): ApiPath<(i64, i64, i64)>,
    ApiJson(payload): ApiJson<HazardPayload>,
) -> ApiResult<Hazard> {
    let scope = user.owner().flight(flight_id).brief(brief_id);
    let patch = payload.into_patch()?;
    let hazard = state
        .hazards
        .update(&scope, &hazard_id, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<Hazard>)?;
    Ok(ApiResponse::success(hazard))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id, hazard_id)): ApiPath<(i64, i64, i64)>,
) -> ApiResult<()> {
    let scope = user.owner().flight(flight_id).brief(brief_id);
    if !state.hazards.delete(&scope, &hazard_id).await? {
        return Err(DatabaseError::not_found::<Hazard>().into());
    }
    Ok(ApiResponse::no_content())
}
