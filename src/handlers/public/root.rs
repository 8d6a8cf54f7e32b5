// handlers/public/root.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root_get(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "FlightWX API",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "endpoints": {
                "users": "/api/v1/users (signup and login public, profile protected)",
                "airports": "/api/v1/airports[/:icao] (protected)",
                "flights": "/api/v1/flights[/:id[/briefs[/:id[/hazards[/:id]]]]] (protected)",
                "named_locations": "/api/v1/named-locations[/:city] (protected)",
                "lists": "/api/v1/lists[/:id[/tasks[/:id]]] (protected)",
                "coordinates": "/api/v1/coordinates/city/:city/country/:country_code (protected)",
                "metars": "/api/v1/metars/{airport/:codes,lat/:lat/lon/:lon} (protected)",
                "tafs": "/api/v1/tafs/{airports/:codes,lat/:lat/lon/:lon} (protected)"
            }
        }
    }))
}

pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
