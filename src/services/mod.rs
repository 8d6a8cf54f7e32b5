pub mod flight_service;
pub mod list_service;
pub mod weather_service;

pub use weather_service::{ReportKind, WeatherError, WeatherService};
