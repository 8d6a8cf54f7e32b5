// routes.rs - Router assembly
//
// Public routes are merged as-is; everything under protected_routes() runs
// behind token_auth_middleware via route_layer, so unmatched paths still
// 404 instead of 401.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::token_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    with_global_layers(router, &config).with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/signup", post(public::signup_post))
        .route("/api/v1/users/login", post(public::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(airport_routes())
        .merge(flight_routes())
        .merge(named_location_routes())
        .merge(list_routes())
        .merge(weather_routes())
        .route_layer(middleware::from_fn_with_state(state, token_auth_middleware))
}

fn account_routes() -> Router<AppState> {
    use protected::account;

    Router::new()
        .route(
            "/api/v1/users",
            get(account::show)
                .put(account::update)
                .patch(account::update)
                .delete(account::destroy),
        )
        .route("/api/v1/users/logout", post(account::logout))
}

fn airport_routes() -> Router<AppState> {
    use protected::airports;

    Router::new()
        .route("/api/v1/airports", get(airports::list).post(airports::create))
        .route(
            "/api/v1/airports/:icao",
            get(airports::show)
                .put(airports::update)
                .patch(airports::update)
                .delete(airports::destroy),
        )
}

fn flight_routes() -> Router<AppState> {
    use protected::{briefs, flights, hazards};

    Router::new()
        .route("/api/v1/flights", get(flights::list).post(flights::create))
        .route(
            "/api/v1/flights/:flight_id",
            get(flights::show)
                .put(flights::update)
                .patch(flights::update)
                .delete(flights::destroy),
        )
        // Briefs nested under their flight
        .route(
            "/api/v1/flights/:flight_id/briefs",
            get(briefs::list).post(briefs::create),
        )
        .route(
            "/api/v1/flights/:flight_id/briefs/:brief_id",
            get(briefs::show)
                .put(briefs::update)
                .patch(briefs::update)
                .delete(briefs::destroy),
        )
        // Hazards nested under their brief
        .route(
            "/api/v1/flights/:flight_id/briefs/:brief_id/hazards",
            get(hazards::list).post(hazards::create),
        )
        .route(
            "/api/v1/flights/:flight_id/briefs/:brief_id/hazards/:hazard_id",
            get(hazards::show)
                .put(hazards::update)
                .patch(hazards::update)
                .delete(hazards::destroy),
        )
}

fn named_location_routes() -> Router<AppState> {
    use protected::named_locations;

    Router::new()
        .route(
            "/api/v1/named-locations",
            get(named_locations::list).post(named_locations::create),
        )
        .route(
            "/api/v1/named-locations/:city",
            get(named_locations::show)
                .put(named_locations::update)
                .patch(named_locations::update)
                .delete(named_locations::destroy),
        )
}

fn list_routes() -> Router<AppState> {
    use protected::{lists, tasks};

    Router::new()
        .route("/api/v1/lists", get(lists::list).post(lists::create))
        .route(
            "/api/v1/lists/:list_id",
            get(lists::show)
                .put(lists::update)
                .patch(lists::update)
                .delete(lists::destroy),
        )
        .route(
            "/api/v1/lists/:list_id/tasks",
            get(tasks::list).post(tasks::create),
        )
        .route(
            "/api/v1/lists/:list_id/tasks/:task_id",
            get(tasks::show)
                .put(tasks::update)
                .patch(tasks::update)
                .delete(tasks::destroy),
        )
}

fn weather_routes() -> Router<AppState> {
    use protected::weather;

    Router::new()
        .route(
            "/api/v1/coordinates/city/:city/country/:country_code",
            get(weather::coordinates),
        )
        .route("/api/v1/metars/airport/:codes", get(weather::metars_by_airport))
        .route("/api/v1/metars/lat/:lat/lon/:lon", get(weather::metar_by_location))
        .route("/api/v1/tafs/airports/:codes", get(weather::tafs_by_airport))
        .route("/api/v1/tafs/lat/:lat/lon/:lon", get(weather::taf_by_location))
}

fn with_global_layers(mut router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    if let Some(cors) = cors_layer(config) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

/// No configured origins means any origin is allowed
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
