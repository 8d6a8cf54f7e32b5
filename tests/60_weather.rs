mod common;

use axum::http::StatusCode;
use common::TestApp;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn coordinates_come_from_openweather() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/data/2.5/weather")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Savannah,US".into()),
            Matcher::UrlEncoded("appid".into(), "test-openweather-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "name": "Savannah",
                "sys": { "country": "US" },
                "coord": { "lat": 32.0835, "lon": -81.0998 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("geo@example.com").await;
    let (status, body) = app.get("/api/v1/coordinates/city/Savannah/country/us", &token).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["city"], "Savannah");
    assert_eq!(body["data"]["country"], "US");
    assert_eq!(body["data"]["latitude"], 32.0835);
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_city_is_no_results() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/data/2.5/weather")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"cod":"404","message":"city not found"}"#)
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("nocity@example.com").await;
    let (status, body) = app.get("/api/v1/coordinates/city/Atlantis/country/GR", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_RESULTS");
    assert_eq!(body["error"], "That city and country combination does not match any results.");
}

#[tokio::test]
async fn metars_are_keyed_by_station() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/metar/KSVN,KCHS")
        .match_header("x-api-key", "test-checkwx-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": 2,
                "data": [
                    { "icao": "KSVN", "raw_text": "KSVN 201453Z 27010KT 10SM FEW030 22/12 A3002" },
                    { "icao": "KCHS", "raw_text": "KCHS 201456Z 26008KT 10SM CLR 23/11 A3001" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("metar@example.com").await;
    let (status, body) = app.get("/api/v1/metars/airport/ksvn,kchs", &token).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["KSVN"]["raw_text"].as_str().unwrap().starts_with("KSVN"));
    assert!(body["data"]["KCHS"]["raw_text"].as_str().unwrap().starts_with("KCHS"));
    mock.assert_async().await;
}

#[tokio::test]
async fn zero_results_for_station_is_no_results() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/taf/KZZZ")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":0,"data":[]}"#)
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("notaf@example.com").await;
    let (status, body) = app.get("/api/v1/tafs/airports/KZZZ", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "That ICAO code does not match any results.");
}

#[tokio::test]
async fn nearest_report_rounds_coordinates() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/taf/lat/32.08/lon/-81.09")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "results": 1, "data": [{ "icao": "KSAV" }] }).to_string())
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("nearest@example.com").await;
    let (status, body) = app.get("/api/v1/tafs/lat/32.076176/lon/-81.088371", &token).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["icao"], "KSAV");
    mock.assert_async().await;
}

#[tokio::test]
async fn no_nearby_station_names_the_report_kind() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/metar/lat/0.00/lon/0.00")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":0,"data":[]}"#)
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("ocean@example.com").await;
    let (status, body) = app.get("/api/v1/metars/lat/0/lon/0", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "That location does not have a nearby airport putting out METARs.");
}

#[tokio::test]
async fn bad_input_never_reaches_upstream() {
    let upstream = mockito::Server::new_async().await;
    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("badinput@example.com").await;

    let (status, body) = app.get("/api/v1/metars/airport/KSVN,TOOLONG", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["icao_code"].is_array());

    let (status, body) = app.get("/api/v1/metars/lat/north/lon/-81", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["latitude"].is_array());

    let (status, _) = app.get("/api/v1/tafs/lat/95/lon/0", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/metar/KSVN")
        .with_status(500)
        .create_async()
        .await;

    let app = TestApp::with_weather(&upstream.url()).await;
    let token = app.signup("gateway@example.com").await;
    let (status, body) = app.get("/api/v1/metars/airport/KSVN", &token).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BAD_GATEWAY");
}

#[tokio::test]
async fn missing_api_key_is_service_unavailable() {
    let app = TestApp::new().await;
    let token = app.signup("nokey@example.com").await;
    let (status, body) = app.get("/api/v1/metars/airport/KSVN", &token).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}
