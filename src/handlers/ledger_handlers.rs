use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{AddXpDto, LeaderboardQuery};
use crate::engine::ledger::{self, ActivityOutcome, LeaderboardEntry, StreakStatusView};
use crate::errors::ApiError;

/// Handler for recording a day of study activity
///
/// This function handles POST requests to `/users/{id}/activity`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
///
/// ### Returns
///
/// The activity outcome (whether the streak advanced) as JSON
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn record_activity_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
) -> Result<Json<ActivityOutcome>, ApiError> {
    info!("Recording study activity");

    let outcome = ledger::record_activity(&pool, &user_id)?;

    Ok(Json(outcome))
}

/// Handler for a direct XP grant
///
/// This function handles POST requests to `/users/{id}/xp`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
/// * `payload` - The non-negative amount to credit
///
/// ### Returns
///
/// An empty JSON object on success
#[instrument(skip(pool), fields(user_id = %user_id, amount = %payload.amount))]
pub async fn add_xp_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddXpDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Crediting XP");

    ledger::add_xp(&pool, &user_id, payload.amount)?;

    Ok(Json(serde_json::json!({})))
}

/// Handler for the leaderboard
///
/// This function handles GET requests to `/leaderboard?scope=weekly|semester`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `query` - The scope to rank by; defaults to weekly
///
/// ### Returns
///
/// The ranked entries as JSON
#[instrument(skip(pool, query))]
pub async fn leaderboard_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    debug!("Computing leaderboard for scope {:?}", query.scope);

    let entries = ledger::leaderboard(&pool, query.scope)?;

    Ok(Json(entries))
}

/// Handler for a student's streak status
///
/// This function handles GET requests to `/users/{id}/streak`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
///
/// ### Returns
///
/// The streak status view as JSON, evaluated against the current day
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn streak_status_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
) -> Result<Json<StreakStatusView>, ApiError> {
    debug!("Computing streak status");

    let view = ledger::streak_status(&pool, &user_id, Utc::now())?;

    Ok(Json(view))
}
