use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::models::{Airport, Brief, Flight, Hazard, List, NamedLocation, Task};
use crate::database::{HealthCheck, Repository, Store, TokenRepository, UserRepository};
use crate::services::weather_service::{WeatherError, WeatherService};

/// Shared handler state: configuration, one repository handle per entity
/// (all backed by the same store) and the outbound weather client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub health: Arc<dyn HealthCheck>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub airports: Arc<dyn Repository<Airport>>,
    pub flights: Arc<dyn Repository<Flight>>,
    pub briefs: Arc<dyn Repository<Brief>>,
    pub hazards: Arc<dyn Repository<Hazard>>,
    pub named_locations: Arc<dyn Repository<NamedLocation>>,
    pub lists: Arc<dyn Repository<List>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub weather: WeatherService,
}

impl AppState {
    pub fn new<S: Store>(config: AppConfig, store: S) -> Result<Self, WeatherError> {
        let weather = WeatherService::new(config.weather.clone())?;
        let store = Arc::new(store);

        Ok(Self {
            config: Arc::new(config),
            health: store.clone(),
            users: store.clone(),
            tokens: store.clone(),
            airports: store.clone(),
            flights: store.clone(),
            briefs: store.clone(),
            hazards: store.clone(),
            named_locations: store.clone(),
            lists: store.clone(),
            tasks: store,
            weather,
        })
    }
}
