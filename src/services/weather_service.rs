//! Outbound client for the weather providers.
//!
//! METAR and TAF reports come from CheckWX, city geocoding from
//! OpenWeatherMap. Responses are passed through as JSON; only the envelope
//! fields needed to detect empty results are decoded.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::validators::{validate_icao_code, validate_region_code, ValidationError};

const CHECKWX: &str = "CheckWX";
const OPENWEATHER: &str = "OpenWeatherMap";
const CHECKWX_KEY_HEADER: &str = "X-API-Key";
const PROXY_COORDINATE_SCALE: u32 = 2;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} responded with {status}")]
    Upstream {
        provider: &'static str,
        status: StatusCode,
    },

    #[error("unexpected payload: {0}")]
    Decode(String),

    #[error("{0}")]
    NoResults(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Metar,
    Taf,
}

impl ReportKind {
    fn path(self) -> &'static str {
        match self {
            ReportKind::Metar => "metar",
            ReportKind::Taf => "taf",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ReportKind::Metar => "METARs",
            ReportKind::Taf => "TAFs",
        }
    }
}

/// Geocoding result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coordinates {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct CheckWxResponse {
    #[serde(default)]
    results: usize,
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    name: String,
    sys: OpenWeatherSys,
    coord: OpenWeatherCoord,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCoord {
    lat: f64,
    lon: f64,
}

#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    config: WeatherConfig,
}

impl WeatherService {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Resolves a city and two-letter country code to coordinates
    pub async fn coordinates(
        &self,
        city: &str,
        country_code: &str,
    ) -> Result<Coordinates, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ValidationError::new("city", "This field may not be blank.").into());
        }
        let country_code =
            validate_region_code("country_code", &country_code.trim().to_uppercase())?;
        let key = self
            .config
            .openweather_api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey(OPENWEATHER))?;

        let url = format!("{}/data/2.5/weather", base(&self.config.openweather_base_url));
        debug!("Geocoding {},{} via {}", city, country_code, OPENWEATHER);
        let response = self
            .client
            .get(&url)
            .query(&[("q", format!("{},{}", city, country_code)), ("appid", key.to_string())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(WeatherError::NoResults(
                    "That city and country combination does not match any results.".to_string(),
                ))
            }
            status if !status.is_success() => {
                return Err(WeatherError::Upstream {
                    provider: OPENWEATHER,
                    status,
                })
            }
            _ => {}
        }

        let body: OpenWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))?;

        Ok(Coordinates {
            city: body.name,
            country: body.sys.country,
            latitude: body.coord.lat,
            longitude: body.coord.lon,
        })
    }

    /// Reports for a comma-separated list of stations, keyed by station code
    pub async fn station_reports(
        &self,
        kind: ReportKind,
        codes: &str,
    ) -> Result<BTreeMap<String, Value>, WeatherError> {
        let codes = parse_station_codes(codes)?;
        let path = format!("{}/{}", kind.path(), codes.join(","));
        let body = self.checkwx(&path).await?;

        if body.results == 0 || body.data.is_empty() {
            return Err(WeatherError::NoResults(
                "That ICAO code does not match any results.".to_string(),
            ));
        }

        Ok(key_by_station(&codes, body.data))
    }

    /// Report from the station nearest to a point
    pub async fn nearest_report(
        &self,
        kind: ReportKind,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Result<Value, WeatherError> {
        let latitude = round_coordinate(check_range("latitude", latitude, 90)?);
        let longitude = round_coordinate(check_range("longitude", longitude, 180)?);
        let path = format!("{}/lat/{}/lon/{}", kind.path(), latitude, longitude);
        let body = self.checkwx(&path).await?;

        if body.results == 0 {
            return Err(WeatherError::NoResults(format!(
                "That location does not have a nearby airport putting out {}.",
                kind.label()
            )));
        }

        body.data
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Decode("results reported but data is empty".to_string()))
    }

    async fn checkwx(&self, path: &str) -> Result<CheckWxResponse, WeatherError> {
        let key = self
            .config
            .checkwx_api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey(CHECKWX))?;

        let url = format!("{}/{}", base(&self.config.checkwx_base_url), path);
        debug!("Fetching {} from {}", path, CHECKWX);
        let response = self
            .client
            .get(&url)
            .header(CHECKWX_KEY_HEADER, key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                provider: CHECKWX,
                status,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Upper-cases and validates each code of `KSVN,kchs`
pub fn parse_station_codes(codes: &str) -> Result<Vec<String>, ValidationError> {
    let codes: Vec<String> = codes
        .split(',')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        return Err(ValidationError::new("icao_code", "At least one ICAO code is required."));
    }
    codes
        .into_iter()
        .map(|code| validate_icao_code("icao_code", &code))
        .collect()
}

/// Decoded records carry their station in `icao`; raw ones fall back to request order
fn key_by_station(codes: &[String], data: Vec<Value>) -> BTreeMap<String, Value> {
    data.into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let station = record
                .get("icao")
                .and_then(Value::as_str)
                .map(str::to_uppercase)
                .or_else(|| codes.get(idx).cloned())?;
            Some((station, record))
        })
        .collect()
}

pub fn parse_coordinate(field: &str, raw: &str) -> Result<Decimal, ValidationError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| ValidationError::new(field, format!("{} is not a valid number.", raw)))
}

fn check_range(field: &str, value: Decimal, bound: i64) -> Result<Decimal, ValidationError> {
    let bound = Decimal::from(bound);
    if value.abs() > bound {
        return Err(ValidationError::new(
            field,
            format!("{} must be between -{} and {}.", value, bound, bound),
        ));
    }
    Ok(value)
}

/// Banker's rounding to two places, always rendered with two decimals
pub fn round_coordinate(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(PROXY_COORDINATE_SCALE);
    rounded.rescale(PROXY_COORDINATE_SCALE);
    rounded
}
