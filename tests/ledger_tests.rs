/// Integration tests for the ledger engine routes
///
/// This file drives activity recording, XP grants, the leaderboard, and
/// streak status through the HTTP API end to end.
use axum::http::StatusCode;
use serde_json::json;

use gradus::models::Degree;
use gradus::repo;

mod common;
use common::*;

#[tokio::test]
async fn test_activity_advances_streak_once_per_day() {
    let (mut app, pool) = create_test_app();
    let user = seed_student(&pool, "l1@example.edu", Degree::Bscs, 1);

    let (status, first) = post_empty(&mut app, &format!("/users/{}/activity", user.get_id())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["streak_updated"], true);
    assert_eq!(first["new_streak"], 1);

    // Same calendar day: the guard refuses a second advance
    let (status, second) = post_empty(&mut app, &format!("/users/{}/activity", user.get_id())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["streak_updated"], false);
    assert_eq!(second["new_streak"], 1);
}

#[tokio::test]
async fn test_activity_unknown_user_404() {
    let (mut app, _pool) = create_test_app();

    let (status, body) = post_empty(&mut app, "/users/nope/activity").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_add_xp_updates_both_counters() {
    let (mut app, pool) = create_test_app();
    let user = seed_student(&pool, "l2@example.edu", Degree::Bscs, 1);

    let (status, _) = post_json(
        &mut app,
        &format!("/users/{}/xp", user.get_id()),
        json!({ "amount": 25 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let fetched = repo::get_user(&pool, &user.get_id()).unwrap().unwrap();
    assert_eq!(fetched.get_xp(), 25);
    assert_eq!(fetched.get_weekly_xp(), 25);
}

#[tokio::test]
async fn test_add_xp_negative_rejected() {
    let (mut app, pool) = create_test_app();
    let user = seed_student(&pool, "l3@example.edu", Degree::Bscs, 1);

    let (status, body) = post_json(
        &mut app,
        &format!("/users/{}/xp", user.get_id()),
        json!({ "amount": -1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let fetched = repo::get_user(&pool, &user.get_id()).unwrap().unwrap();
    assert_eq!(fetched.get_xp(), 0);
}

#[tokio::test]
async fn test_leaderboard_scopes_rank_differently() {
    let (mut app, pool) = create_test_app();
    let a = seed_student(&pool, "a@example.edu", Degree::Bscs, 1);
    let b = seed_student(&pool, "b@example.edu", Degree::Bscs, 1);

    // a leads lifetime but has weekly zeroed by a promotion; b leads weekly
    let day = gradus::calendar::today();
    repo::credit_xp(&pool, &a.get_id(), 100, day).unwrap();
    repo::apply_promotion(&pool, &a.get_id(), 2, day).unwrap();
    repo::credit_xp(&pool, &b.get_id(), 40, day).unwrap();

    let (status, weekly) = get_json(&mut app, "/leaderboard?scope=weekly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weekly[0]["score"], 40);

    let (status, semester) = get_json(&mut app, "/leaderboard?scope=semester").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(semester[0]["score"], 100);
}

#[tokio::test]
async fn test_leaderboard_defaults_to_weekly() {
    let (mut app, pool) = create_test_app();
    let user = seed_student(&pool, "d@example.edu", Degree::Bsit, 3);
    repo::credit_xp(&pool, &user.get_id(), 15, gradus::calendar::today()).unwrap();

    let (status, entries) = get_json(&mut app, "/leaderboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries[0]["score"], 15);
}

#[tokio::test]
async fn test_streak_status_for_idle_user() {
    let (mut app, pool) = create_test_app();
    let user = seed_student(&pool, "idle@example.edu", Degree::Bsse, 1);

    let (status, view) = get_json(&mut app, &format!("/users/{}/streak", user.get_id())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["completed_today"], false);
    assert_eq!(view["streak_days"], 0);
    assert_eq!(view["state"], "inactive");
}
