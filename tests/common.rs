/// Common test utilities for Gradus integration tests
///
/// This file contains shared functions for all integration tests: test
/// application setup and helpers for driving the router and seeding the
/// store directly where no admin route exists.
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

use gradus::db::{self, DbPool};
use gradus::models::{Degree, Role, User};
use gradus::repo;

/// Creates a test application backed by a fresh in-memory SQLite database
///
/// A unique shared-cache URI is used so every pooled connection sees the
/// same database, while separate tests stay isolated from each other.
///
/// ### Returns
///
/// The configured router together with the pool, for seeding data the
/// API has no admin routes for
pub fn create_test_app() -> (Router, Arc<DbPool>) {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:itest_{}?mode=memory&cache=shared", unique_id);
    let pool = Arc::new(db::init_pool(&database_url));

    let conn = &mut pool.get().unwrap();
    gradus::run_migrations(conn);

    (gradus::create_app(pool.clone()), pool)
}

/// Seeds a student directly in the store
pub fn seed_student(pool: &DbPool, email: &str, degree: Degree, semester: i32) -> User {
    repo::create_user(
        pool,
        email.to_string(),
        "Test Student".to_string(),
        Role::Student,
        degree,
        semester,
    )
    .unwrap()
}

/// Sends a POST request with a JSON body and returns status and parsed body
pub async fn post_json(app: &mut Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

/// Sends a bodyless POST request and returns status and parsed body
pub async fn post_empty(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

/// Sends a GET request and returns status and parsed body
pub async fn get_json(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}
