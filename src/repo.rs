/// Repository module
///
/// Data access layer. Each function maps to a small number of SQL
/// statements; all the consistency-sensitive writes are expressed as
/// single-statement atomic primitives (guarded updates, in-place
/// increments, INSERT OR IGNORE set-adds) so concurrent callers cannot
/// lose updates. The engines in `crate::engine` compose these.

mod course_repo;
mod group_repo;
mod progress_repo;
mod task_repo;
mod user_repo;

// Re-export all repository functions
pub use course_repo::*;
pub use group_repo::*;
pub use progress_repo::*;
pub use task_repo::*;
pub use user_repo::*;

#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use crate::db::{self, DbPool};
    use diesel::connection::SimpleConnection;

    /// Sets up a test database with migrations applied
    ///
    /// Uses a unique shared in-memory database per test. Plain ":memory:"
    /// gives each pooled connection its own separate database, so migrations
    /// run on one connection wouldn't be visible on others; a unique URI with
    /// cache=shared makes the pool share one database while keeping tests
    /// isolated from each other.
    pub fn setup_test_db() -> Arc<DbPool> {
        let unique_id = uuid::Uuid::new_v4();
        let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
        let pool = db::init_pool(&database_url);

        let mut conn = pool.get().expect("Failed to get connection");

        // Enable foreign key constraints for SQLite
        conn.batch_execute("PRAGMA foreign_keys = ON").unwrap();

        crate::run_migrations(&mut conn);

        Arc::new(pool)
    }
}
