use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::ledger::LeaderboardScope;
use crate::models::TaskDisposition;

/// Data transfer object for marking a lesson completed
///
/// This struct is used to deserialize JSON requests for lesson completion.
#[derive(Deserialize, Debug)]
pub struct CompleteLessonDto {
    /// The ID of the student completing the lesson
    pub user_id: String,
}

/// Data transfer object for submitting a module pre-assessment
///
/// Answers are sparse: question index to chosen option index. Unanswered
/// questions simply score zero.
#[derive(Deserialize, Debug)]
pub struct SubmitPreAssessmentDto {
    /// The ID of the student attempting the test-out
    pub user_id: String,

    /// Chosen option index per question index
    pub answers: HashMap<usize, usize>,
}

/// Data transfer object for a direct XP grant
#[derive(Deserialize, Debug)]
pub struct AddXpDto {
    /// The amount of XP to credit, must be non-negative
    pub amount: i32,
}

/// Query parameters for the course accessibility view
#[derive(Deserialize, Debug)]
pub struct AccessibilityQuery {
    /// The ID of the student whose view to compute
    pub user_id: String,
}

/// Query parameters for the leaderboard
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct LeaderboardQuery {
    /// Which score column to rank by
    pub scope: LeaderboardScope,
}

/// Data transfer object for setting a student's task status
#[derive(Deserialize, Debug)]
pub struct SetTaskStatusDto {
    /// How the student disposed of the task
    pub disposition: TaskDisposition,
}
