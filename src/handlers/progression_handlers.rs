use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{AccessibilityQuery, CompleteLessonDto, SubmitPreAssessmentDto};
use crate::engine::progression::{self, CourseAccessibility, PreAssessmentOutcome};
use crate::errors::ApiError;

/// Handler for marking a lesson completed
///
/// This function handles POST requests to `/lessons/{id}/complete`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `lesson_id` - The ID of the lesson, extracted from the URL path
/// * `payload` - The request payload naming the student
///
/// ### Returns
///
/// An empty JSON object on success
#[instrument(skip(pool, payload), fields(lesson_id = %lesson_id))]
pub async fn complete_lesson_handler(
    State(pool): State<Arc<DbPool>>,
    Path(lesson_id): Path<String>,
    Json(payload): Json<CompleteLessonDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Completing lesson for user {}", payload.user_id);

    progression::complete_lesson(&pool, &payload.user_id, &lesson_id)?;

    Ok(Json(serde_json::json!({})))
}

/// Handler for submitting a module pre-assessment
///
/// This function handles POST requests to
/// `/courses/{course_id}/modules/{module_id}/pre-assessment`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `course_id`, `module_id` - Extracted from the URL path
/// * `payload` - The student ID and their sparse answer map
///
/// ### Returns
///
/// The grading outcome as JSON
#[instrument(skip(pool, payload), fields(course_id = %course_id, module_id = %module_id))]
pub async fn submit_pre_assessment_handler(
    State(pool): State<Arc<DbPool>>,
    Path((course_id, module_id)): Path<(String, String)>,
    Json(payload): Json<SubmitPreAssessmentDto>,
) -> Result<Json<PreAssessmentOutcome>, ApiError> {
    info!("Grading pre-assessment for user {}", payload.user_id);

    let outcome = progression::submit_pre_assessment(
        &pool,
        &payload.user_id,
        &module_id,
        &course_id,
        &payload.answers,
    )?;

    Ok(Json(outcome))
}

/// Handler for the course accessibility view
///
/// This function handles GET requests to
/// `/courses/{id}/accessibility?user_id=`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `course_id` - The ID of the course, extracted from the URL path
/// * `query` - The student whose view to compute
///
/// ### Returns
///
/// The per-module, per-lesson accessibility view as JSON
#[instrument(skip(pool, query), fields(course_id = %course_id))]
pub async fn get_accessibility_handler(
    State(pool): State<Arc<DbPool>>,
    Path(course_id): Path<String>,
    Query(query): Query<AccessibilityQuery>,
) -> Result<Json<CourseAccessibility>, ApiError> {
    debug!("Computing accessibility view for user {}", query.user_id);

    let view = progression::get_accessibility(&pool, &query.user_id, &course_id)?;

    Ok(Json(view))
}
