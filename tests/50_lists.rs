mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn list_completion_follows_its_tasks() {
    let app = TestApp::new().await;
    let token = app.signup("lists@example.com").await;

    let (status, body) = app.post("/api/v1/lists", &token, json!({ "name": "Preflight" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["completed"], false);
    assert_eq!(body["data"]["tasks"], json!([]));
    let list_id = body["data"]["id"].as_i64().unwrap();
    let list_uri = format!("/api/v1/lists/{}", list_id);
    let tasks_uri = format!("{}/tasks", list_uri);

    let (_, body) = app
        .post(&tasks_uri, &token, json!({ "name": "Check fuel", "completed": true }))
        .await;
    let fuel = body["data"]["id"].as_i64().unwrap();
    let (_, body) = app.get(&list_uri, &token).await;
    assert_eq!(body["data"]["completed"], true);

    let (_, body) = app.post(&tasks_uri, &token, json!({ "name": "Check oil" })).await;
    let oil = body["data"]["id"].as_i64().unwrap();
    let (_, body) = app.get(&list_uri, &token).await;
    assert_eq!(body["data"]["completed"], false);
    assert_eq!(body["data"]["tasks"].as_array().map(Vec::len), Some(2));

    let (status, _) = app
        .patch(&format!("{}/{}", tasks_uri, oil), &token, json!({ "completed": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&list_uri, &token).await;
    assert_eq!(body["data"]["completed"], true);

    // Removing every task leaves the flag where it was
    for task in [oil, fuel] {
        let (status, _) = app.delete(&format!("{}/{}", tasks_uri, task), &token).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (_, body) = app.get(&list_uri, &token).await;
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["tasks"], json!([]));
}

#[tokio::test]
async fn deleting_an_incomplete_task_completes_the_list() {
    let app = TestApp::new().await;
    let token = app.signup("finish@example.com").await;

    let (_, body) = app.post("/api/v1/lists", &token, json!({ "name": "Postflight" })).await;
    let list_uri = format!("/api/v1/lists/{}", body["data"]["id"]);
    let tasks_uri = format!("{}/tasks", list_uri);

    app.post(&tasks_uri, &token, json!({ "name": "Tie down", "completed": true })).await;
    let (_, body) = app.post(&tasks_uri, &token, json!({ "name": "Log hours" })).await;
    let pending = body["data"]["id"].as_i64().unwrap();

    app.delete(&format!("{}/{}", tasks_uri, pending), &token).await;
    let (_, body) = app.get(&list_uri, &token).await;
    assert_eq!(body["data"]["completed"], true);
}

#[tokio::test]
async fn list_and_task_names_are_validated() {
    let app = TestApp::new().await;
    let token = app.signup("names@example.com").await;

    let (status, body) = app.post("/api/v1/lists", &token, json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["name"][0], "This field may not be blank.");

    let (_, body) = app.post("/api/v1/lists", &token, json!({ "name": "Cargo" })).await;
    let tasks_uri = format!("/api/v1/lists/{}/tasks", body["data"]["id"]);
    let (status, body) = app.post(&tasks_uri, &token, json!({ "name": "x".repeat(256) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["name"].is_array());
}

#[tokio::test]
async fn tasks_of_another_users_list_are_hidden() {
    let app = TestApp::new().await;
    let owner = app.signup("list-owner@example.com").await;
    let other = app.signup("list-other@example.com").await;

    let (_, body) = app.post("/api/v1/lists", &owner, json!({ "name": "Private" })).await;
    let tasks_uri = format!("/api/v1/lists/{}/tasks", body["data"]["id"]);
    let (_, body) = app.post(&tasks_uri, &owner, json!({ "name": "Secret" })).await;
    let task_uri = format!("{}/{}", tasks_uri, body["data"]["id"]);

    assert_eq!(app.get(&tasks_uri, &other).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&task_uri, &other).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&task_uri, &other).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&task_uri, &owner).await.0, StatusCode::OK);
}
