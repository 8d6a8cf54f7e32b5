mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn signup_returns_profile_and_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/users/signup",
            None,
            Some(json!({
                "email": "Pilot@Example.com",
                "password": PASSWORD,
                "display_name": "pilot_one",
                "first_name": "Amelia",
                "last_name": "Earhart"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["email"], "pilot@example.com");
    assert_eq!(data["display_name"], "pilot_one");
    assert_eq!(data["token"].as_str().map(str::len), Some(43));
    assert!(data.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_field_error() {
    let app = TestApp::new().await;
    app.signup("dup@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/users/signup",
            None,
            Some(json!({
                "email": "DUP@example.com",
                "password": PASSWORD,
                "display_name": "pilot_two",
                "first_name": "Bessie",
                "last_name": "Coleman"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["email"][0], "user with this email already exists.");
}

#[tokio::test]
async fn signup_reports_every_invalid_field() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/users/signup",
            None,
            Some(json!({
                "email": "not-an-email",
                "password": "short",
                "first_name": "amelia"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = &body["field_errors"];
    for field in ["email", "password", "display_name", "first_name", "last_name"] {
        assert!(errors.get(field).is_some(), "missing error for {}: {}", field, body);
    }
    assert_eq!(errors["display_name"][0], "This field is required.");
}

#[tokio::test]
async fn login_issues_a_fresh_token() {
    let app = TestApp::new().await;
    let first = app.signup("login@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(json!({ "email": "login@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let second = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    // Both sessions stay valid
    assert_eq!(app.get("/api/v1/users", &first).await.0, StatusCode::OK);
    assert_eq!(app.get("/api/v1/users", &second).await.0, StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_are_not_found() {
    let app = TestApp::new().await;
    app.signup("creds@example.com").await;

    for payload in [
        json!({ "email": "creds@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    ] {
        let (status, body) = app
            .send(Method::POST, "/api/v1/users/login", None, Some(payload))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No user matching these credentials");
    }
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/v1/airports", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    let (status, body) = app.get("/api/v1/airports", "not-a-real-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");
}

#[tokio::test]
async fn logout_revokes_only_the_presented_token() {
    let app = TestApp::new().await;
    let token = app.signup("logout@example.com").await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/users/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    assert_eq!(app.get("/api/v1/users", &token).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_can_be_read_and_patched() {
    let app = TestApp::new().await;
    let token = app.signup("profile@example.com").await;

    let (status, body) = app
        .patch("/api/v1/users", &token, json!({ "first_name": "Jacqueline" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Jacqueline");
    assert_eq!(body["data"]["last_name"], "Earhart");

    let (status, body) = app.patch("/api/v1/users", &token, json!({ "display_name": "abc" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["display_name"].is_array());

    let (_, body) = app.get("/api/v1/users", &token).await;
    assert_eq!(body["data"]["email"], "profile@example.com");
    assert_eq!(body["data"]["first_name"], "Jacqueline");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
