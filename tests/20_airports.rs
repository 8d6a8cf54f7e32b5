mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn empty_collection_is_an_empty_array() {
    let app = TestApp::new().await;
    let token = app.signup("empty@example.com").await;

    let (status, body) = app.get("/api/v1/airports", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn airport_crud_by_icao_code() {
    let app = TestApp::new().await;
    let token = app.signup("crud@example.com").await;

    let (status, body) = app
        .post(
            "/api/v1/airports",
            &token,
            json!({ "icao_code": "KSVN", "name": "Hunter Army Airfield" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["icao_code"], "KSVN");
    assert!(body["data"]["user"].is_i64());

    // Path lookup is case-insensitive
    let (status, body) = app.get("/api/v1/airports/ksvn", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Hunter Army Airfield");

    let (status, body) = app
        .patch("/api/v1/airports/KSVN", &token, json!({ "name": "Hunter Field" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Hunter Field");
    assert_eq!(body["data"]["icao_code"], "KSVN");

    let (status, _) = app.delete("/api/v1/airports/KSVN", &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.delete("/api/v1/airports/KSVN", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_fields_are_reported_per_field() {
    let app = TestApp::new().await;
    let token = app.signup("invalid@example.com").await;

    let (status, body) = app
        .post("/api/v1/airports", &token, json!({ "icao_code": "ksv", "name": "lowercase name" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["field_errors"]["icao_code"][0],
        "ksv is not a valid ICAO code. It should consist of only 4 capitalized characters."
    );
    assert!(body["field_errors"]["name"].is_array());
}

#[tokio::test]
async fn duplicate_code_for_same_user_is_an_integrity_error() {
    let app = TestApp::new().await;
    let token = app.signup("twice@example.com").await;
    app.create_airport(&token, "KCHS").await;

    let (status, body) = app
        .post("/api/v1/airports", &token, json!({ "icao_code": "KCHS", "name": "Charleston" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INTEGRITY_ERROR");
}

#[tokio::test]
async fn airports_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;
    app.create_airport(&alice, "KCHS").await;

    // Same code is free for another user
    app.create_airport(&bob, "KCHS").await;

    let (_, body) = app.get("/api/v1/airports", &alice).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = app.delete("/api/v1/airports/KCHS", &bob).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get("/api/v1/airports/KCHS", &alice).await;
    assert_eq!(status, StatusCode::OK);
}
