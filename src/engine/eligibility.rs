use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::{CourseGroup, Role};
use crate::repo;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Final semester; promotion never moves past it
const MAX_SEMESTER: i32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionOutcome {
    pub semester: i32,
}

/// Recomputes one course's group from scratch
///
/// Triggered whenever a course's eligibility rule changes (including
/// creation). A full recompute, not a diff: a rule change can affect an
/// unbounded number of students, and a diff would need the previous rule
/// re-evaluated per student. The replaced membership carries a snapshot of
/// the rule it was computed from.
///
/// ### Returns
///
/// The resulting member count; 0 with no writes when the course is gone
/// (a concurrent delete makes the group moot, so the sync is abandoned
/// silently).
#[instrument(skip(pool), fields(course_id = %course_id))]
pub fn sync_course_group(pool: &DbPool, course_id: &str) -> Result<usize, ApiError> {
    let Some(course) = repo::get_course(pool, course_id)? else {
        debug!("Course gone at sync time, abandoning");
        return Ok(0);
    };

    let programs = repo::get_course_programs(pool, &course.get_id())?;
    let students = repo::list_students_matching(pool, course.get_semester(), &programs)?;
    let member_ids: Vec<String> = students.iter().map(|s| s.get_id()).collect();

    let group = CourseGroup::new(&course.get_code(), &programs, course.get_semester());
    repo::replace_group(pool, &group, &member_ids)?;

    info!(
        "Synced group {} with {} member(s)",
        course.get_code(),
        member_ids.len()
    );
    Ok(member_ids.len())
}

/// Re-derives one student's group memberships
///
/// Triggered whenever a student's degree or semester changes (including
/// registration). Add before remove: the student picks up every
/// newly-eligible group first, then is pulled from everything else, so a
/// profile move never leaves a transient window with zero memberships. A
/// brief window of stale extra membership is acceptable; groups are a
/// visibility hint, not an authorization boundary.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn sync_student_groups(pool: &DbPool, user_id: &str) -> Result<(), ApiError> {
    let Some(user) = repo::get_user(pool, user_id)? else {
        debug!("User gone at sync time, abandoning");
        return Ok(());
    };
    if user.get_role() != Role::Student {
        debug!("Not a student, nothing to sync");
        return Ok(());
    }

    let eligible = repo::list_courses_for_profile(pool, user.get_semester(), user.get_degree())?;

    // Phase 1: add. Group headers are upserted so a member row never
    // dangles without its group.
    let mut eligible_codes = Vec::with_capacity(eligible.len());
    for course in &eligible {
        let programs = repo::get_course_programs(pool, &course.get_id())?;
        let group = CourseGroup::new(&course.get_code(), &programs, course.get_semester());
        repo::upsert_group(pool, &group)?;
        repo::add_member(pool, &course.get_code(), user_id)?;
        eligible_codes.push(course.get_code());
    }

    // Phase 2: remove from everything no longer eligible.
    let removed = repo::remove_member_except(pool, user_id, &eligible_codes)?;

    info!(
        "Synced student {} into {} group(s), removed from {}",
        user_id,
        eligible_codes.len(),
        removed
    );
    Ok(())
}

/// Promotes a student to the next semester
///
/// Bumps the profile, clears per-course progress (the new semester starts
/// fresh), and resyncs group memberships so the student immediately sees
/// the new semester's courses.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn promote_student(pool: &DbPool, user_id: &str) -> Result<PromotionOutcome, ApiError> {
    let user = repo::get_user(pool, user_id)?.ok_or(ApiError::NotFound("User"))?;
    if user.get_role() != Role::Student {
        return Err(ApiError::Validation("Only students can be promoted".to_string()));
    }
    if user.get_semester() >= MAX_SEMESTER {
        return Err(ApiError::Validation(format!(
            "Already in final semester {}",
            MAX_SEMESTER
        )));
    }

    let new_semester = user.get_semester() + 1;
    repo::apply_promotion(pool, user_id, new_semester, crate::calendar::today())?;
    repo::delete_progress_for_user(pool, user_id)?;
    sync_student_groups(pool, user_id)?;

    Ok(PromotionOutcome {
        semester: new_semester,
    })
}
