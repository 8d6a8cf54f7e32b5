// handlers/protected/flights.rs - /api/v1/flights[/:flight_id]

use axum::{extract::State, Extension};

use crate::database::models::{Flight, FlightDetail, FlightPayload};
use crate::database::DatabaseError;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::flight_service::{ensure_destination_stored, flight_detail};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<FlightDetail>> {
    let owner = user.owner();
    let mut flights = Vec::new();
    for flight in state.flights.select_any(&owner).await? {
        flights.push(flight_detail(&state, &owner, flight).await?);
    }
    Ok(ApiResponse::success(flights))
}

/**
 * POST /api/v1/flights
 *
 * The destination must already be one of the caller's stored airports.
 * Field validation runs first so a payload with both problems reports the
 * field map, not DESTINATION_NOT_FOUND.
 */
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<FlightPayload>,
) -> ApiResult<FlightDetail> {
    let owner = user.owner();
    let new = payload.into_new()?;
    ensure_destination_stored(&state, &owner, &new.destination).await?;

    let flight = state.flights.insert(&owner, new).await?;
    tracing::info!("User {} filed flight {}", owner.user_id, flight.id);
    Ok(ApiResponse::created(FlightDetail {
        flight,
        briefs: Vec::new(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(flight_id): ApiPath<i64>,
) -> ApiResult<FlightDetail> {
    let owner = user.owner();
    let flight = state.flights.select_404(&owner, &flight_id).await?;
    Ok(ApiResponse::success(flight_detail(&state, &owner, flight).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(flight_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<FlightPayload>,
) -> ApiResult<FlightDetail> {
    let owner = user.owner();
    let patch = payload.into_patch()?;
    let flight = state
        .flights
        .update(&owner, &flight_id, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<Flight>)?;
    Ok(ApiResponse::success(flight_detail(&state, &owner, flight).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(flight_id): ApiPath<i64>,
) -> ApiResult<()> {
    if !state.flights.delete(&user.owner(), &flight_id).await? {
        return Err(DatabaseError::not_found::<Flight>().into());
    }
    Ok(ApiResponse::no_content())
}
