use crate::db::DbPool;
use crate::models::{CompletedLesson, CourseProgress, UnlockedModule};
use crate::schema::{completed_lessons, course_progress, unlocked_modules};
use anyhow::{anyhow, Result};
use diesel::prelude::*;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Fetches the progress record for a (student, course) pair, if any
pub fn get_progress(pool: &DbPool, user_id: &str, course_id: &str) -> Result<Option<CourseProgress>> {
    let conn = &mut pool.get()?;

    let result = course_progress::table
        .filter(course_progress::user_id.eq(user_id))
        .filter(course_progress::course_id.eq(course_id))
        .first::<CourseProgress>(conn)
        .optional()?;

    Ok(result)
}

/// Fetches or lazily creates the progress record for a (student, course) pair
///
/// Insert-then-fetch: a concurrent creator hitting the (user_id, course_id)
/// unique index is absorbed by ON CONFLICT DO NOTHING, and the follow-up
/// select returns whichever row won. This is the "Conflict means fetch
/// existing" policy.
#[instrument(skip(pool), fields(user_id = %user_id, course_id = %course_id))]
pub fn ensure_progress(pool: &DbPool, user_id: &str, course_id: &str) -> Result<CourseProgress> {
    let conn = &mut pool.get()?;

    diesel::insert_into(course_progress::table)
        .values(CourseProgress::new(user_id, course_id))
        .on_conflict_do_nothing()
        .execute(conn)?;

    let progress = course_progress::table
        .filter(course_progress::user_id.eq(user_id))
        .filter(course_progress::course_id.eq(course_id))
        .first::<CourseProgress>(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Progress row vanished after upsert"))?;

    debug!("Progress record: {}", progress.get_id());
    Ok(progress)
}

/// Adds a lesson to the completed-lessons set (idempotent)
pub fn mark_lesson_completed(pool: &DbPool, progress_id: &str, lesson_id: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::insert_into(completed_lessons::table)
        .values(CompletedLesson::new(progress_id, lesson_id))
        .on_conflict_do_nothing()
        .execute(conn)?;

    Ok(())
}

/// The completed-lessons set for a progress record
pub fn completed_lesson_ids(pool: &DbPool, progress_id: &str) -> Result<HashSet<String>> {
    let conn = &mut pool.get()?;

    let ids = completed_lessons::table
        .filter(completed_lessons::progress_id.eq(progress_id))
        .select(completed_lessons::lesson_id)
        .load::<String>(conn)?;

    Ok(ids.into_iter().collect())
}

/// Unions a set of modules into the unlocked-modules set
///
/// Add-to-set per module: re-granting an already-unlocked module is a no-op,
/// and two concurrent grants merge instead of clobbering each other. The set
/// never shrinks.
#[instrument(skip(pool, module_ids), fields(progress_id = %progress_id, count = module_ids.len()))]
pub fn grant_modules(pool: &DbPool, progress_id: &str, module_ids: &[String]) -> Result<()> {
    let conn = &mut pool.get()?;

    for module_id in module_ids {
        diesel::insert_into(unlocked_modules::table)
            .values(UnlockedModule::new(progress_id, module_id))
            .on_conflict_do_nothing()
            .execute(conn)?;
    }

    debug!("Granted {} module(s)", module_ids.len());
    Ok(())
}

/// The unlocked-modules set for a progress record
pub fn unlocked_module_ids(pool: &DbPool, progress_id: &str) -> Result<HashSet<String>> {
    let conn = &mut pool.get()?;

    let ids = unlocked_modules::table
        .filter(unlocked_modules::progress_id.eq(progress_id))
        .select(unlocked_modules::module_id)
        .load::<String>(conn)?;

    Ok(ids.into_iter().collect())
}

/// Deletes every progress record a student owns (promotion / account removal)
///
/// The completed-lesson and unlocked-module sets go with them via cascade.
pub fn delete_progress_for_user(pool: &DbPool, user_id: &str) -> Result<usize> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(course_progress::table.filter(course_progress::user_id.eq(user_id)))
        .execute(conn)?;

    debug!("Deleted {} progress record(s) for user {}", deleted, user_id);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Degree, Role};
    use crate::repo::tests::setup_test_db;
    use crate::repo::{create_course, create_user};

    fn fixtures(pool: &DbPool) -> (String, String) {
        let user = create_user(
            pool,
            "p@example.edu".to_string(),
            "P".to_string(),
            Role::Student,
            Degree::Bscs,
            1,
        )
        .unwrap();
        let course = create_course(
            pool,
            "CS101".to_string(),
            "Intro".to_string(),
            1,
            &[Degree::Bscs],
        )
        .unwrap();
        (user.get_id(), course.get_id())
    }

    #[test]
    fn test_ensure_progress_is_idempotent() {
        let pool = setup_test_db();
        let (user_id, course_id) = fixtures(&pool);

        let first = ensure_progress(&pool, &user_id, &course_id).unwrap();
        let second = ensure_progress(&pool, &user_id, &course_id).unwrap();

        assert_eq!(first.get_id(), second.get_id());
        assert!(get_progress(&pool, &user_id, &course_id).unwrap().is_some());
    }

    #[test]
    fn test_mark_lesson_completed_set_semantics() {
        let pool = setup_test_db();
        let (user_id, course_id) = fixtures(&pool);
        let progress = ensure_progress(&pool, &user_id, &course_id).unwrap();

        mark_lesson_completed(&pool, &progress.get_id(), "lesson-1").unwrap();
        mark_lesson_completed(&pool, &progress.get_id(), "lesson-1").unwrap();
        mark_lesson_completed(&pool, &progress.get_id(), "lesson-2").unwrap();

        let completed = completed_lesson_ids(&pool, &progress.get_id()).unwrap();
        assert_eq!(completed.len(), 2);
        assert!(completed.contains("lesson-1"));
        assert!(completed.contains("lesson-2"));
    }

    #[test]
    fn test_grant_modules_unions_never_shrinks() {
        let pool = setup_test_db();
        let (user_id, course_id) = fixtures(&pool);
        let progress = ensure_progress(&pool, &user_id, &course_id).unwrap();

        grant_modules(&pool, &progress.get_id(), &["m1".to_string(), "m2".to_string()]).unwrap();
        grant_modules(&pool, &progress.get_id(), &["m2".to_string(), "m3".to_string()]).unwrap();

        let unlocked = unlocked_module_ids(&pool, &progress.get_id()).unwrap();
        assert_eq!(unlocked.len(), 3);
        for id in ["m1", "m2", "m3"] {
            assert!(unlocked.contains(id));
        }
    }

    #[test]
    fn test_delete_progress_for_user_cascades_sets() {
        let pool = setup_test_db();
        let (user_id, course_id) = fixtures(&pool);
        let progress = ensure_progress(&pool, &user_id, &course_id).unwrap();
        mark_lesson_completed(&pool, &progress.get_id(), "lesson-1").unwrap();
        grant_modules(&pool, &progress.get_id(), &["m1".to_string()]).unwrap();

        let deleted = delete_progress_for_user(&pool, &user_id).unwrap();
        assert_eq!(deleted, 1);

        assert!(get_progress(&pool, &user_id, &course_id).unwrap().is_none());
        assert!(completed_lesson_ids(&pool, &progress.get_id()).unwrap().is_empty());
        assert!(unlocked_module_ids(&pool, &progress.get_id()).unwrap().is_empty());
    }
}
