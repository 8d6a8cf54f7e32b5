#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use tower::ServiceExt;

use flightwx_api::config::AppConfig;
use flightwx_api::database::{DatabaseManager, MemoryStore, PgStore};
use flightwx_api::{app, AppState};

pub const PASSWORD: &str = "correct-horse-battery";

/// Set to run every suite against Postgres instead of the memory store.
/// Each app migrates its own schema, so point it at a scratch database.
pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

/// In-process router over a fresh store
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::development()).await
    }

    /// Points both weather providers at a mock server
    pub async fn with_weather(base_url: &str) -> Self {
        let mut config = AppConfig::development();
        config.weather.checkwx_base_url = base_url.to_string();
        config.weather.checkwx_api_key = Some("test-checkwx-key".to_string());
        config.weather.openweather_base_url = base_url.to_string();
        config.weather.openweather_api_key = Some("test-openweather-key".to_string());
        Self::with_config(config).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let state = match std::env::var(TEST_DATABASE_URL) {
            Ok(url) => AppState::new(config, isolated_pg_store(&url).await),
            Err(_) => AppState::new(config, MemoryStore::default()),
        }
        .expect("app state");
        Self { router: app(state) }
    }

    /// Sends one request and returns the status plus the decoded body
    /// (`Value::Null` for empty bodies such as 204)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates an account and returns its token
    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/users/signup",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "display_name": "pilot_one",
                    "first_name": "Amelia",
                    "last_name": "Earhart"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body["data"]["token"].as_str().expect("token").to_string()
    }

    pub async fn create_airport(&self, token: &str, icao_code: &str) {
        let (status, body) = self
            .post(
                "/api/v1/airports",
                token,
                json!({ "icao_code": icao_code, "name": "Savannah Hilton Head" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "airport failed: {}", body);
    }

    /// Files a flight to KCHS; the caller must have stored that airport
    pub async fn create_flight(&self, token: &str, tail_number: i32) -> i64 {
        let (status, body) = self.post("/api/v1/flights", token, flight_body(tail_number)).await;
        assert_eq!(status, StatusCode::CREATED, "flight failed: {}", body);
        body["data"]["id"].as_i64().expect("flight id")
    }
}

/// Migrates a schema nobody else uses and pins the pool's search_path to it
async fn isolated_pg_store(url: &str) -> PgStore {
    let schema = format!("flightwx_test_{:016x}", rand::random::<u64>());
    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .expect("connect to test database");
    sqlx::query(&format!("CREATE SCHEMA {}", schema))
        .execute(&admin)
        .await
        .expect("create schema");
    admin.close().await;

    let options = PgConnectOptions::from_str(url)
        .expect("test database url")
        .options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .expect("connect to test schema");
    DatabaseManager::migrate(&pool).await.expect("migrate test schema");
    PgStore::new(pool)
}

pub fn flight_body(tail_number: i32) -> Value {
    json!({
        "tail_number": tail_number,
        "aircraft_type_model": "C172",
        "pilot_responsible": "Amelia Earhart",
        "origin": "KSVN",
        "destination": "KCHS",
        "flight_level": 3500,
        "takeoff_time": "2026-10-20T14:00:00Z",
        "arrival_time": "2026-10-20T15:30:00Z"
    })
}

pub fn brief_body(brief_time: &str) -> Value {
    json!({
        "surface_winds": "27010KT",
        "flight_level_winds": "28025G35KT",
        "visibility": "10SM",
        "sky_condition": "FEW030 SCT250",
        "temperature": "22",
        "altimeter_setting": "A3002",
        "brief_time": brief_time,
        "void_time": "2026-10-20T18:00:00Z"
    })
}
