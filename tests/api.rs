//! Endpoint tests driven through the router in-process (no network).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reading_clubs_api::auth::AuthService;
use reading_clubs_api::db::MemoryStore;
use reading_clubs_api::{app, AppState};

fn test_app() -> Router {
    app(AppState {
        store: Arc::new(MemoryStore::seeded()),
        auth: AuthService::new("test-secret-key", 60),
    })
}

async fn request(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Register a user and return a valid bearer token
async fn bearer(app: &Router) -> String {
    let (status, _) = request(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "test@example.com",
            "username": "testuser",
            "password": "securepassword123",
            "fullName": "Test User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app,
        Method::POST,
        "/token",
        None,
        Some(json!({"username": "testuser", "password": "securepassword123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn welcome_is_public() {
    let app = test_app();

    let (status, body) = request(&app, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Reading Clubs"));
}

#[tokio::test]
async fn club_routes_require_bearer_token() {
    let app = test_app();

    let (status, body) = request(&app, Method::GET, "/clubs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());

    let (status, _) = request(&app, Method::GET, "/clubs", Some("not-a-real-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_flow() {
    let app = test_app();

    // Register
    let (status, body) = request(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "test@example.com",
            "username": "testuser",
            "password": "securepassword123",
            "fullName": "Test User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "test@example.com");
    assert!(body["id"].is_i64());

    // Login success
    let (status, body) = request(
        &app,
        Method::POST,
        "/token",
        None,
        Some(json!({"username": "testuser", "password": "securepassword123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");

    // Login fails - wrong password
    let (status, _) = request(
        &app,
        Method::POST,
        "/token",
        None,
        Some(json!({"username": "testuser", "password": "wrongpassword"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Login fails - wrong username
    let (status, _) = request(
        &app,
        Method::POST,
        "/token",
        None,
        Some(json!({"username": "wronguser", "password": "securepassword123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lists_seeded_clubs_in_insertion_order() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::GET, "/clubs", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let clubs = body.as_array().unwrap();
    assert_eq!(clubs.len(), 3);
    assert_eq!(clubs[0]["id"], 1);
    assert_eq!(clubs[0]["name"], "Lectores Nocturnos");
    assert_eq!(clubs[2]["id"], 3);
}

#[tokio::test]
async fn create_club_assigns_id_and_date() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/clubs",
        Some(&token),
        Some(json!({"name": "X", "description": "Y", "favorite_genre": "Z", "members": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 4);
    assert_eq!(body["name"], "X");
    assert_eq!(body["description"], "Y");
    assert_eq!(body["favorite_genre"], "Z");
    assert_eq!(body["members"], 0);
    assert!(!body["created_date"].as_str().unwrap().is_empty());

    // The new club shows up in the listing exactly once
    let (_, list) = request(&app, Method::GET, "/clubs", Some(&token), None).await;
    let matches: Vec<&Value> = list
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["id"] == 4)
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "X");
}

#[tokio::test]
async fn create_club_rejects_invalid_payloads() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/clubs",
        Some(&token),
        Some(json!({"name": "", "description": "Y", "favorite_genre": "Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = request(
        &app,
        Method::POST,
        "/clubs",
        Some(&token),
        Some(json!({"name": "X", "description": "Y", "favorite_genre": "Z", "members": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_missing_club_is_not_found() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::GET, "/clubs/999", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn partial_update_preserves_other_fields() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(
        &app,
        Method::PUT,
        "/clubs/1",
        Some(&token),
        Some(json!({"name": "Lectores Diurnos"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Lectores Diurnos");
    assert_eq!(body["description"], "Club para amantes de la lectura nocturna");
    assert_eq!(body["favorite_genre"], "Misterio");
    assert_eq!(body["created_date"], "2024-01-15");
    assert_eq!(body["members"], 25);

    // Updating a non-existent club is a 404
    let (status, body) = request(
        &app,
        Method::PUT,
        "/clubs/999",
        Some(&token),
        Some(json!({"name": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn delete_club_cascades_member_list() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::DELETE, "/clubs/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = request(&app, Method::GET, "/clubs/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = request(&app, Method::GET, "/clubs", Some(&token), None).await;
    assert!(list.as_array().unwrap().iter().all(|c| c["id"] != 2));

    // Its member list is empty afterwards, not an error
    let (status, members) =
        request(&app, Method::GET, "/clubs/2/members", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members, json!([]));
}

#[tokio::test]
async fn delete_missing_club_is_not_found() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::DELETE, "/clubs/999", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn lists_seeded_members() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::GET, "/clubs/1/members", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["id"], 101);
    assert_eq!(members[0]["email"], "ana@correo.com");
    assert_eq!(members[1]["id"], 102);
}

#[tokio::test]
async fn club_without_members_lists_empty() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(&app, Method::GET, "/clubs/3/members", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Unknown club id also yields [], never an error
    let (status, body) = request(&app, Method::GET, "/clubs/42/members", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn add_member_grows_list_by_one() {
    let app = test_app();
    let token = bearer(&app).await;

    let (_, before) = request(&app, Method::GET, "/clubs/1/members", Some(&token), None).await;
    let count_before = before.as_array().unwrap().len();

    let (status, created) = request(
        &app,
        Method::POST,
        "/clubs/1/members",
        Some(&token),
        Some(json!({"name": "Luis Pérez", "email": "luis@correo.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Luis Pérez");
    assert!(!created["joined_date"].as_str().unwrap().is_empty());

    let new_id = created["id"].as_i64().unwrap();
    assert!(before.as_array().unwrap().iter().all(|m| m["id"] != new_id));

    let (_, after) = request(&app, Method::GET, "/clubs/1/members", Some(&token), None).await;
    assert_eq!(after.as_array().unwrap().len(), count_before + 1);

    // The denormalized counter moves with the list
    let (_, club) = request(&app, Method::GET, "/clubs/1", Some(&token), None).await;
    assert_eq!(club["members"], 26);
}

#[tokio::test]
async fn add_member_to_missing_club_is_not_found() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/clubs/999/members",
        Some(&token),
        Some(json!({"name": "Luis", "email": "luis@correo.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn add_member_rejects_invalid_payloads() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, _) = request(
        &app,
        Method::POST,
        "/clubs/1/members",
        Some(&token),
        Some(json!({"name": "", "email": "luis@correo.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = request(
        &app,
        Method::POST,
        "/clubs/1/members",
        Some(&token),
        Some(json!({"name": "Luis", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn remove_member_shrinks_list() {
    let app = test_app();
    let token = bearer(&app).await;

    let (status, body) = request(
        &app,
        Method::DELETE,
        "/clubs/1/members/101",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, members) = request(&app, Method::GET, "/clubs/1/members", Some(&token), None).await;
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["id"], 102);
}

#[tokio::test]
async fn remove_missing_member_is_not_found() {
    let app = test_app();
    let token = bearer(&app).await;

    // Member id that was never issued
    let (status, _) = request(
        &app,
        Method::DELETE,
        "/clubs/1/members/999",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Member 201 exists but belongs to club 2
    let (status, _) = request(
        &app,
        Method::DELETE,
        "/clubs/1/members/201",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Missing club
    let (status, body) = request(
        &app,
        Method::DELETE,
        "/clubs/999/members/101",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}
