/// Gradus: a learning progression and eligibility engine
///
/// This library provides the core functionality for a degree-program
/// learning portal: a one-way module/lesson unlock state machine with
/// pre-assessment test-out, a daily streak and XP ledger, and a
/// denormalized course-group membership view kept consistent with the
/// authoritative course and student records.
///
/// ### Modules
///
/// - `calendar`: calendar-day normalization for streak accounting
/// - `config`: configuration loading and merging
/// - `db`: database connection management
/// - `dto`: request payload and query-string shapes
/// - `engine`: the progression, ledger, and eligibility engines
/// - `errors`: the API error type and its HTTP mapping
/// - `handlers`: axum request handlers, one per route
/// - `models`: data structures backing the store
/// - `repo`: repository layer for database operations
/// - `schema`: database schema definitions
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `POST /lessons/{id}/complete`: Mark a lesson completed
/// - `POST /courses/{course_id}/modules/{module_id}/pre-assessment`: Grade a test-out attempt
/// - `GET /courses/{id}/accessibility`: Per-module, per-lesson access view
/// - `POST /users/{id}/activity`: Record a day of study activity
/// - `POST /users/{id}/xp`: Credit XP directly
/// - `GET /leaderboard`: Weekly or semester ranking
/// - `GET /users/{id}/streak`: Streak status
/// - `POST /courses/{id}/sync-group`: Recompute a course's group
/// - `POST /users/{id}/sync-groups`: Re-derive a student's memberships
/// - `POST /users/{id}/promote`: Promote a student to the next semester
/// - `GET /users/{id}/tasks`: Pending tasks
/// - `POST /users/{id}/tasks/{task_id}/status`: Record a task disposition
pub mod calendar;
pub mod config;
pub mod db;
pub mod dto;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod schema;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use handlers::*;

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    Router::new()
        // Progression engine
        .route("/lessons/{id}/complete", post(complete_lesson_handler))
        .route(
            "/courses/{course_id}/modules/{module_id}/pre-assessment",
            post(submit_pre_assessment_handler),
        )
        .route("/courses/{id}/accessibility", get(get_accessibility_handler))
        // Ledger engine
        .route("/users/{id}/activity", post(record_activity_handler))
        .route("/users/{id}/xp", post(add_xp_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/users/{id}/streak", get(streak_status_handler))
        // Eligibility sync engine
        .route("/courses/{id}/sync-group", post(sync_course_group_handler))
        .route("/users/{id}/sync-groups", post(sync_student_groups_handler))
        .route("/users/{id}/promote", post(promote_student_handler))
        // Tasks
        .route("/users/{id}/tasks", get(pending_tasks_handler))
        .route(
            "/users/{id}/tasks/{task_id}/status",
            post(set_task_status_handler),
        )
        .layer(CorsLayer::permissive())
        // Add the database pool to the application state
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::{Connection, RunQueryDsl, SqliteConnection};

    /// Migrations should create every table the schema declares
    #[test]
    fn test_run_migrations() {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();

        run_migrations(&mut conn);

        for table in [
            "users",
            "courses",
            "modules",
            "lessons",
            "course_progress",
            "course_groups",
            "tasks",
        ] {
            let result = diesel::sql_query(format!(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='{}'",
                table
            ))
            .execute(&mut conn);
            assert!(result.is_ok());
        }
    }
}
