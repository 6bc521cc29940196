use crate::db::DbPool;
use crate::engine::ledger;
use crate::errors::ApiError;
use crate::repo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Result of scoring a pre-assessment submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreAssessmentOutcome {
    pub passed: bool,
    pub score: i32,
    pub total_questions: i32,
    pub xp_gained: i32,
}

/// Derived per-lesson state; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Locked,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonAccess {
    pub lesson_id: String,
    pub title: String,
    pub position: i32,
    pub status: LessonStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleAccess {
    pub module_id: String,
    pub title: String,
    pub position: i32,
    pub unlocked: bool,
    pub lessons: Vec<LessonAccess>,
}

/// The full per-module/per-lesson status tree for one (student, course) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAccessibility {
    pub course_id: String,
    pub modules: Vec<ModuleAccess>,
}

/// Marks a lesson completed for a student
///
/// Idempotent for progress state: completing an already-completed lesson
/// changes nothing in `completed-lessons`, but still feeds the ledger's
/// daily-activity signal so a repeat study session keeps the streak alive.
#[instrument(skip(pool), fields(user_id = %user_id, lesson_id = %lesson_id))]
pub fn complete_lesson(pool: &DbPool, user_id: &str, lesson_id: &str) -> Result<(), ApiError> {
    let lesson = repo::get_lesson(pool, lesson_id)?.ok_or(ApiError::NotFound("Lesson"))?;
    let module = repo::get_module(pool, &lesson.get_module_id())?.ok_or(ApiError::NotFound("Module"))?;

    let progress = repo::ensure_progress(pool, user_id, &module.get_course_id())?;
    repo::mark_lesson_completed(pool, &progress.get_id(), lesson_id)?;

    debug!("Lesson marked completed, signaling daily activity");
    ledger::record_activity(pool, user_id)?;

    Ok(())
}

/// Scores a test-out submission and unlocks modules on a pass
///
/// The only path by which a module is unlocked out of sequence. On a pass
/// the unlock set — every module ordered before the target, plus the target
/// itself — is unioned into `unlocked-modules` first; the XP award happens
/// after and is never rolled into the same transaction, so a failed award
/// leaves the unlock in place (progression availability over strict
/// atomicity).
#[instrument(skip(pool, answers), fields(user_id = %user_id, module_id = %module_id))]
pub fn submit_pre_assessment(
    pool: &DbPool,
    user_id: &str,
    module_id: &str,
    course_id: &str,
    answers: &HashMap<usize, usize>,
) -> Result<PreAssessmentOutcome, ApiError> {
    let module = repo::get_module(pool, module_id)?.ok_or(ApiError::NotFound("Module"))?;
    if module.get_course_id() != course_id {
        return Err(ApiError::NotFound("Module"));
    }

    let passing_percentage = module
        .get_passing_percentage()
        .ok_or(ApiError::NotFound("Pre-assessment"))?;
    let questions = repo::list_questions_for_module(pool, module_id)?;
    if questions.is_empty() {
        return Err(ApiError::NotFound("Pre-assessment"));
    }

    // Exact index match; an out-of-range option index is simply incorrect
    // for that question, not an error.
    let score = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers.get(index).is_some_and(|&choice| {
                choice < question.option_count() && choice as i32 == question.get_correct_answer()
            })
        })
        .count() as i32;

    let total_questions = questions.len() as i32;
    let required = (total_questions * passing_percentage + 99) / 100;
    let passed = score >= required;

    debug!(score, total_questions, required, passed, "Scored pre-assessment");

    if !passed {
        return Ok(PreAssessmentOutcome {
            passed: false,
            score,
            total_questions,
            xp_gained: 0,
        });
    }

    // Unlock set: everything ordered before the target, plus the target.
    let unlock_ids: Vec<String> = repo::list_modules_for_course(pool, course_id)?
        .iter()
        .filter(|m| m.get_position() < module.get_position())
        .map(|m| m.get_id())
        .chain(std::iter::once(module.get_id()))
        .collect();

    let progress = repo::ensure_progress(pool, user_id, course_id)?;
    repo::grant_modules(pool, &progress.get_id(), &unlock_ids)?;

    info!("Unlocked {} module(s) for user {}", unlock_ids.len(), user_id);

    // Unlock is already durable; an error from the award propagates without
    // undoing it. Each passing submission re-awards, even when the modules
    // were already unlocked.
    let xp_gained = score * 10;
    ledger::add_xp(pool, user_id, xp_gained)?;

    Ok(PreAssessmentOutcome {
        passed: true,
        score,
        total_questions,
        xp_gained,
    })
}

/// Computes the derived unlock/completion tree for one (student, course) pair
///
/// A module is unlocked iff it sits at position 0 or was explicitly granted.
/// Lessons inside a locked module are always `locked`, regardless of any
/// completion history recorded while the module was open.
#[instrument(skip(pool), fields(user_id = %user_id, course_id = %course_id))]
pub fn get_accessibility(
    pool: &DbPool,
    user_id: &str,
    course_id: &str,
) -> Result<CourseAccessibility, ApiError> {
    let course = repo::get_course(pool, course_id)?.ok_or(ApiError::NotFound("Course"))?;

    // No progress record yet means nothing completed, nothing granted.
    let (completed, unlocked) = match repo::get_progress(pool, user_id, course_id)? {
        Some(progress) => (
            repo::completed_lesson_ids(pool, &progress.get_id())?,
            repo::unlocked_module_ids(pool, &progress.get_id())?,
        ),
        None => Default::default(),
    };

    let mut modules = Vec::new();
    for module in repo::list_modules_for_course(pool, &course.get_id())? {
        let module_unlocked = module.get_position() == 0 || unlocked.contains(&module.get_id());

        let lessons = repo::list_lessons_for_module(pool, &module.get_id())?
            .iter()
            .map(|lesson| {
                let status = if !module_unlocked {
                    LessonStatus::Locked
                } else if completed.contains(&lesson.get_id()) {
                    LessonStatus::Completed
                } else {
                    LessonStatus::Active
                };
                LessonAccess {
                    lesson_id: lesson.get_id(),
                    title: lesson.get_title(),
                    position: lesson.get_position(),
                    status,
                }
            })
            .collect();

        modules.push(ModuleAccess {
            module_id: module.get_id(),
            title: module.get_title(),
            position: module.get_position(),
            unlocked: module_unlocked,
            lessons,
        });
    }

    Ok(CourseAccessibility {
        course_id: course.get_id(),
        modules,
    })
}
