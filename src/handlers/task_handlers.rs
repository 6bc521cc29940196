use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::SetTaskStatusDto;
use crate::errors::ApiError;
use crate::models::Task;
use crate::repo;

/// Handler for listing a student's pending tasks
///
/// This function handles GET requests to `/users/{id}/tasks`. Tasks the
/// student has already completed or deleted are filtered out.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
///
/// ### Returns
///
/// The pending tasks as JSON
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn pending_tasks_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    debug!("Listing pending tasks");

    let tasks = repo::pending_tasks(&pool, &user_id).map_err(ApiError::Database)?;

    Ok(Json(tasks))
}

/// Handler for setting a student's task status
///
/// This function handles POST requests to
/// `/users/{id}/tasks/{task_id}/status`. A repeated status write for the
/// same task wins over the previous one.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id`, `task_id` - Extracted from the URL path
/// * `payload` - The disposition to record
///
/// ### Returns
///
/// An empty JSON object on success
#[instrument(skip(pool, payload), fields(user_id = %user_id, task_id = %task_id))]
pub async fn set_task_status_handler(
    State(pool): State<Arc<DbPool>>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(payload): Json<SetTaskStatusDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Setting task status to {:?}", payload.disposition);

    repo::get_task(&pool, &task_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Task"))?;

    repo::set_task_status(&pool, &user_id, &task_id, payload.disposition)
        .map_err(ApiError::Database)?;

    Ok(Json(serde_json::json!({})))
}
