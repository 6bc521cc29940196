use crate::calendar;
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::repo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Leaderboard size cap
const LEADERBOARD_LIMIT: i64 = 50;

/// Result of a daily-activity signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOutcome {
    pub streak_updated: bool,
    pub new_streak: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardScope {
    #[default]
    Weekly,
    Semester,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakState {
    Inactive,
    Active,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakStatusView {
    pub completed_today: bool,
    pub streak_days: i32,
    pub state: StreakState,
}

/// Records a qualifying study action for today's calendar day
///
/// Lesson completion is the canonical trigger; quiz and task completion
/// deliberately do not feed the streak. The guarded update in the repo makes
/// N same-day calls advance the streak exactly once. A missed day does not
/// reset the count; gaps are only visible as absent days in the history.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn record_activity(pool: &DbPool, user_id: &str) -> Result<ActivityOutcome, ApiError> {
    repo::get_user(pool, user_id)?.ok_or(ApiError::NotFound("User"))?;

    let today = calendar::today();
    let streak_updated = repo::advance_streak_guarded(pool, user_id, today)?;
    if streak_updated {
        repo::record_streak_day(pool, user_id, today)?;
    }

    let new_streak = repo::get_user(pool, user_id)?
        .ok_or(ApiError::NotFound("User"))?
        .get_streak_days();

    debug!(streak_updated, new_streak, "Recorded activity");
    Ok(ActivityOutcome {
        streak_updated,
        new_streak,
    })
}

/// Credits XP to the lifetime, weekly, and daily ledgers
///
/// Zero is a no-op; negative amounts are rejected before any mutation.
#[instrument(skip(pool), fields(user_id = %user_id, amount = %amount))]
pub fn add_xp(pool: &DbPool, user_id: &str, amount: i32) -> Result<(), ApiError> {
    if amount < 0 {
        return Err(ApiError::Validation(format!(
            "XP amount must be non-negative, got {}",
            amount
        )));
    }
    if amount == 0 {
        return Ok(());
    }

    repo::get_user(pool, user_id)?.ok_or(ApiError::NotFound("User"))?;
    repo::credit_xp(pool, user_id, amount, calendar::today())?;

    Ok(())
}

/// Top-50 students for the requested scope
///
/// Ties rank in store order; no further tie-break is defined.
pub fn leaderboard(pool: &DbPool, scope: LeaderboardScope) -> Result<Vec<LeaderboardEntry>, ApiError> {
    let entries = match scope {
        LeaderboardScope::Weekly => repo::top_students_by_weekly_xp(pool, LEADERBOARD_LIMIT)?
            .iter()
            .map(|u| LeaderboardEntry {
                name: u.get_name(),
                score: u.get_weekly_xp(),
            })
            .collect(),
        LeaderboardScope::Semester => repo::top_students_by_lifetime_xp(pool, LEADERBOARD_LIMIT)?
            .iter()
            .map(|u| LeaderboardEntry {
                name: u.get_name(),
                score: u.get_xp(),
            })
            .collect(),
    };

    Ok(entries)
}

/// Derived streak read for a reference instant
///
/// `completed_today` compares by calendar day, not instant. Milestone means
/// a positive streak divisible by seven.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn streak_status(
    pool: &DbPool,
    user_id: &str,
    reference: DateTime<Utc>,
) -> Result<StreakStatusView, ApiError> {
    let user = repo::get_user(pool, user_id)?.ok_or(ApiError::NotFound("User"))?;

    let completed_today = repo::has_streak_day(pool, user_id, calendar::day_key(reference))?;
    let streak_days = user.get_streak_days();

    let state = if streak_days == 0 {
        StreakState::Inactive
    } else if streak_days % 7 == 0 {
        StreakState::Milestone
    } else {
        StreakState::Active
    };

    Ok(StreakStatusView {
        completed_today,
        streak_days,
        state,
    })
}
