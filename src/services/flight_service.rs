use crate::database::models::{Brief, BriefDetail, Flight, FlightDetail};
use crate::database::{FlightScope, Owner};
use crate::error::ApiError;
use crate::state::AppState;

/// Rejects a new flight whose destination is not among the user's airports
pub async fn ensure_destination_stored(
    state: &AppState,
    owner: &Owner,
    destination: &str,
) -> Result<(), ApiError> {
    let stored = state
        .airports
        .select_one(owner, &destination.to_string())
        .await?;
    if stored.is_none() {
        tracing::debug!("Destination {} not stored for user {}", destination, owner.user_id);
        return Err(ApiError::DestinationNotFound);
    }
    Ok(())
}

pub async fn brief_detail(
    state: &AppState,
    scope: &FlightScope,
    brief: Brief,
) -> Result<BriefDetail, ApiError> {
    let hazards = state.hazards.select_any(&scope.brief(brief.id)).await?;
    Ok(BriefDetail { brief, hazards })
}

pub async fn flight_detail(
    state: &AppState,
    owner: &Owner,
    flight: Flight,
) -> Result<FlightDetail, ApiError> {
    let scope = owner.flight(flight.id);
    let mut briefs = Vec::new();
    for brief in state.briefs.select_any(&scope).await? {
        briefs.push(brief_detail(state, &scope, brief).await?);
    }
    Ok(FlightDetail { flight, briefs })
}
