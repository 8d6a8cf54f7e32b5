mod common;

use axum::http::StatusCode;
use common::{brief_body, flight_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn destination_must_be_a_stored_airport() {
    let app = TestApp::new().await;
    let token = app.signup("dest@example.com").await;

    let (status, body) = app.post("/api/v1/flights", &token, flight_body(101)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DESTINATION_NOT_FOUND");
    assert_eq!(
        body["error"],
        "Destination code not found in your stored airport codes."
    );
    assert!(body.get("field_errors").is_none());
}

#[tokio::test]
async fn field_errors_win_over_destination_check() {
    let app = TestApp::new().await;
    let token = app.signup("fields@example.com").await;

    let mut payload = flight_body(42);
    payload["destination"] = json!("kchs");
    let (status, body) = app.post("/api/v1/flights", &token, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["tail_number"].is_array());
    assert!(body["field_errors"]["destination"].is_array());
}

#[tokio::test]
async fn flight_defaults_and_nested_briefs() {
    let app = TestApp::new().await;
    let token = app.signup("defaults@example.com").await;
    app.create_airport(&token, "KCHS").await;

    let mut payload = flight_body(202);
    payload.as_object_mut().unwrap().remove("flight_level");
    payload.as_object_mut().unwrap().remove("takeoff_time");
    let (status, body) = app.post("/api/v1/flights", &token, payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["flight_level"], 1000);
    assert!(body["data"]["takeoff_time"].is_string());
    assert_eq!(body["data"]["briefs"], json!([]));

    let flight_id = body["data"]["id"].as_i64().unwrap();
    let briefs = format!("/api/v1/flights/{}/briefs", flight_id);
    let (status, body) = app.post(&briefs, &token, brief_body("2026-10-20T12:00:00Z")).await;
    assert_eq!(status, StatusCode::CREATED);
    let brief_id = body["data"]["id"].as_i64().unwrap();

    let hazards = format!("{}/{}/hazards", briefs, brief_id);
    let hazard = json!({ "type": "Icing", "information": "Moderate icing above FL080" });
    let (status, body) = app.post(&hazards, &token, hazard).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "Icing");

    let (status, body) = app.get(&format!("/api/v1/flights/{}", flight_id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["briefs"][0]["id"], brief_id);
    assert_eq!(body["data"]["briefs"][0]["hazards"][0]["type"], "Icing");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = TestApp::new().await;
    let token = app.signup("update@example.com").await;
    app.create_airport(&token, "KCHS").await;
    let flight_id = app.create_flight(&token, 303).await;
    let uri = format!("/api/v1/flights/{}", flight_id);

    let (status, body) = app.patch(&uri, &token, json!({ "callsign": "N303AB" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["callsign"], "N303AB");
    assert_eq!(body["data"]["tail_number"], 303);
    assert_eq!(body["data"]["flight_level"], 3500);

    let (status, body) = app.patch(&uri, &token, json!({ "tail_number": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["tail_number"].is_array());
}

#[tokio::test]
async fn brief_time_is_unique() {
    let app = TestApp::new().await;
    let token = app.signup("brieftime@example.com").await;
    app.create_airport(&token, "KCHS").await;
    let flight_id = app.create_flight(&token, 404).await;
    let briefs = format!("/api/v1/flights/{}/briefs", flight_id);

    let (status, _) = app.post(&briefs, &token, brief_body("2026-10-20T09:00:00Z")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.post(&briefs, &token, brief_body("2026-10-20T09:00:00Z")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INTEGRITY_ERROR");
}

#[tokio::test]
async fn foreign_and_malformed_ids_are_not_found() {
    let app = TestApp::new().await;
    let alice = app.signup("owner@example.com").await;
    let mallory = app.signup("other@example.com").await;
    app.create_airport(&alice, "KCHS").await;
    let flight_id = app.create_flight(&alice, 505).await;
    let briefs = format!("/api/v1/flights/{}/briefs", flight_id);

    let flight = format!("/api/v1/flights/{}", flight_id);
    assert_eq!(app.get(&flight, &mallory).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&briefs, &mallory).await.0, StatusCode::NOT_FOUND);
    let (status, _) = app.post(&briefs, &mallory, brief_body("2026-10-20T10:00:00Z")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.get("/api/v1/flights/abc", &alice).await.0, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/v1/flights/999999/briefs", &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hazards_are_editable_by_their_owner_only() {
    let app = TestApp::new().await;
    let alice = app.signup("hazard-owner@example.com").await;
    let mallory = app.signup("hazard-other@example.com").await;
    app.create_airport(&alice, "KCHS").await;
    let flight_id = app.create_flight(&alice, 606).await;
    let briefs = format!("/api/v1/flights/{}/briefs", flight_id);
    let (_, body) = app.post(&briefs, &alice, brief_body("2026-10-20T11:00:00Z")).await;
    let hazards = format!("{}/{}/hazards", briefs, body["data"]["id"]);

    let hazard = json!({ "type": "Turbulence", "information": "Light chop below FL060" });
    let (status, body) = app.post(&hazards, &alice, hazard).await;
    assert_eq!(status, StatusCode::CREATED);
    let hazard = format!("{}/{}", hazards, body["data"]["id"]);

    let (status, body) = app.get(&hazard, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["information"], "Light chop below FL060");

    let (status, body) = app
        .patch(&hazard, &alice, json!({ "information": "Moderate chop below FL060" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "Turbulence");
    assert_eq!(body["data"]["information"], "Moderate chop below FL060");

    assert_eq!(app.get(&hazard, &mallory).await.0, StatusCode::NOT_FOUND);
    let (status, _) = app.patch(&hazard, &mallory, json!({ "type": "Icing" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&hazard, &mallory).await.0, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&hazard, &alice).await;
    assert_eq!(body["data"]["type"], "Turbulence");

    assert_eq!(app.delete(&hazard, &alice).await.0, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&hazard, &alice).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&hazards, &alice).await.1["data"], json!([]));
}

#[tokio::test]
async fn times_are_stored_to_the_microsecond() {
    let app = TestApp::new().await;
    let token = app.signup("precision@example.com").await;
    app.create_airport(&token, "KCHS").await;

    let mut payload = flight_body(707);
    payload["arrival_time"] = json!("2026-10-20T15:30:00.987654321Z");
    let (status, body) = app.post("/api/v1/flights", &token, payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["arrival_time"], "2026-10-20T15:30:00.987654Z");

    let briefs = format!("/api/v1/flights/{}/briefs", body["data"]["id"]);
    let (status, body) = app
        .post(&briefs, &token, brief_body("2026-10-21T08:00:00.123456789Z"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["brief_time"], "2026-10-21T08:00:00.123456Z");

    let brief = format!("{}/{}", briefs, body["data"]["id"]);
    let (_, body) = app.get(&brief, &token).await;
    assert_eq!(body["data"]["brief_time"], "2026-10-21T08:00:00.123456Z");
}
