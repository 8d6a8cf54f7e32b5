// handlers/protected/briefs.rs - /api/v1/flights/:flight_id/briefs[/:brief_id]

use axum::{extract::State, Extension};

use crate::database::models::{Brief, BriefDetail, BriefPayload, Flight};
use crate::database::{DatabaseError, FlightScope};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::flight_service::brief_detail;
use crate::state::AppState;

/// Resolves the parent flight first so a foreign or missing flight 404s
async fn flight_scope(
    state: &AppState,
    user: &AuthUser,
    flight_id: i64,
) -> Result<FlightScope, DatabaseError> {
    let owner = user.owner();
    let flight: Flight = state.flights.select_404(&owner, &flight_id).await?;
    Ok(owner.flight(flight.id))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(flight_id): ApiPath<i64>,
) -> ApiResult<Vec<BriefDetail>> {
    let scope = flight_scope(&state, &user, flight_id).await?;
    let mut briefs = Vec::new();
    for brief in state.briefs.select_any(&scope).await? {
        briefs.push(brief_detail(&state, &scope, brief).await?);
    }
    Ok(ApiResponse::success(briefs))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(flight_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BriefPayload>,
) -> ApiResult<BriefDetail> {
    let scope = flight_scope(&state, &user, flight_id).await?;
    let new = payload.into_new()?;
    let brief = state.briefs.insert(&scope, new).await?;
    Ok(ApiResponse::created(BriefDetail {
        brief,
        hazards: Vec::new(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id)): ApiPath<(i64, i64)>,
) -> ApiResult<BriefDetail> {
    let scope = user.owner().flight(flight_id);
    let brief = state.briefs.select_404(&scope, &brief_id).await?;
    Ok(ApiResponse::success(brief_detail(&state, &scope, brief).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<BriefPayload>,
) -> ApiResult<BriefDetail> {
    let scope = user.owner().flight(flight_id);
    let patch = payload.into_patch()?;
    let brief = state
        .briefs
        .update(&scope, &brief_id, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<Brief>)?;
    Ok(ApiResponse::success(brief_detail(&state, &scope, brief).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((flight_id, brief_id)): ApiPath<(i64, i64)>,
) -> ApiResult<()> {
    let scope = user.owner().flight(flight_id);
    if !state.briefs.delete(&scope, &brief_id).await? {
        return Err(DatabaseError::not_found::<Brief>().into());
    }
    Ok(ApiResponse::no_content())
}
