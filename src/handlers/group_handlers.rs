use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::engine::eligibility::{self, PromotionOutcome};
use crate::errors::ApiError;

/// Handler for recomputing a course's group
///
/// This function handles POST requests to `/courses/{id}/sync-group`.
/// Meant to be called after any change to the course's eligibility rule.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `course_id` - The ID of the course, extracted from the URL path
///
/// ### Returns
///
/// The resulting member count as JSON; 0 when the course no longer exists
#[instrument(skip(pool), fields(course_id = %course_id))]
pub async fn sync_course_group_handler(
    State(pool): State<Arc<DbPool>>,
    Path(course_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Syncing course group");

    let members = eligibility::sync_course_group(&pool, &course_id)?;

    Ok(Json(serde_json::json!({ "members": members })))
}

/// Handler for re-deriving a student's group memberships
///
/// This function handles POST requests to `/users/{id}/sync-groups`.
/// Meant to be called after any change to the student's degree or semester.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
///
/// ### Returns
///
/// An empty JSON object; a missing or non-student user is a silent no-op
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn sync_student_groups_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Syncing student groups");

    eligibility::sync_student_groups(&pool, &user_id)?;

    Ok(Json(serde_json::json!({})))
}

/// Handler for promoting a student to the next semester
///
/// This function handles POST requests to `/users/{id}/promote`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the student, extracted from the URL path
///
/// ### Returns
///
/// The promotion outcome (new semester) as JSON
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn promote_student_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
) -> Result<Json<PromotionOutcome>, ApiError> {
    info!("Promoting student");

    let outcome = eligibility::promote_student(&pool, &user_id)?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Degree, Role};
    use crate::repo::{self, tests::setup_test_db};

    #[tokio::test]
    async fn test_sync_course_group_handler_missing_course() {
        let pool = setup_test_db();

        let body = sync_course_group_handler(State(pool.clone()), Path("nope".to_string()))
            .await
            .unwrap()
            .0;

        assert_eq!(body["members"], 0);
    }

    #[tokio::test]
    async fn test_promote_student_handler() {
        let pool = setup_test_db();
        let user = repo::create_user(
            &pool,
            "p@example.edu".to_string(),
            "P".to_string(),
            Role::Student,
            Degree::Bscs,
            3,
        )
        .unwrap();

        let outcome = promote_student_handler(State(pool.clone()), Path(user.get_id()))
            .await
            .unwrap()
            .0;

        assert_eq!(outcome.semester, 4);
    }
}
