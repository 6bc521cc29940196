use crate::db::DbPool;
use crate::models::{DailyXpEntry, Degree, Role, StreakEntry, User};
use crate::schema::{daily_xp, streak_entries, users};
use anyhow::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new user account
///
/// ### Errors
///
/// Returns an error if the email is already taken (unique index) or the
/// insert fails.
#[instrument(skip(pool), fields(email = %email))]
pub fn create_user(
    pool: &DbPool,
    email: String,
    name: String,
    role: Role,
    degree: Degree,
    semester: i32,
) -> Result<User> {
    debug!("Creating new user");
    let conn = &mut pool.get()?;

    let new_user = User::new(email, name, role, degree, semester);

    diesel::insert_into(users::table)
        .values(new_user.clone())
        .execute(conn)?;

    info!("Created user with id: {}", new_user.get_id());
    Ok(new_user)
}

/// Retrieves a user by id, or None if absent
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Deletes a user account
///
/// Dependent rows (progress, streak history, daily ledger, task tombstones)
/// go with it via foreign-key cascade.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn delete_user(pool: &DbPool, user_id: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::delete(users::table.find(user_id)).execute(conn)?;

    info!("Deleted user {}", user_id);
    Ok(())
}

/// Lists all students matching an eligibility predicate
///
/// The predicate is `semester == s && degree IN programs`, evaluated against
/// current data; admins never match.
pub fn list_students_matching(pool: &DbPool, semester: i32, programs: &[Degree]) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let results = users::table
        .filter(users::role.eq(Role::Student))
        .filter(users::semester.eq(semester))
        .filter(users::degree.eq_any(programs.iter().copied()))
        .load::<User>(conn)?;

    Ok(results)
}

/// Advances the user's streak if no activity has been recorded today
///
/// Single guarded UPDATE: the `last_study_date IS NULL OR < day` condition
/// makes a same-day repeat a no-op, and two concurrent calls cannot both
/// increment because the second one no longer matches the guard.
///
/// ### Returns
///
/// `true` if the streak advanced, `false` if today was already recorded.
#[instrument(skip(pool), fields(user_id = %user_id, day = %day))]
pub fn advance_streak_guarded(pool: &DbPool, user_id: &str, day: NaiveDate) -> Result<bool> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(
        users::table
            .filter(users::id.eq(user_id))
            .filter(users::last_study_date.is_null().or(users::last_study_date.lt(day))),
    )
    .set((
        users::streak_days.eq(users::streak_days + 1),
        users::last_study_date.eq(day),
    ))
    .execute(conn)?;

    debug!("Streak advance affected {} row(s)", updated);
    Ok(updated > 0)
}

/// Appends a calendar day to the user's streak history (add-to-set)
pub fn record_streak_day(pool: &DbPool, user_id: &str, day: NaiveDate) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::insert_into(streak_entries::table)
        .values(StreakEntry::new(user_id, day))
        .on_conflict_do_nothing()
        .execute(conn)?;

    Ok(())
}

/// Checks whether a calendar day is present in the streak history
pub fn has_streak_day(pool: &DbPool, user_id: &str, day: NaiveDate) -> Result<bool> {
    let conn = &mut pool.get()?;

    let count: i64 = streak_entries::table
        .filter(streak_entries::user_id.eq(user_id))
        .filter(streak_entries::day.eq(day))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// All recorded activity days for a user, oldest first
pub fn get_streak_history(pool: &DbPool, user_id: &str) -> Result<Vec<NaiveDate>> {
    let conn = &mut pool.get()?;

    let days = streak_entries::table
        .filter(streak_entries::user_id.eq(user_id))
        .order_by(streak_entries::day.asc())
        .select(streak_entries::day)
        .load::<NaiveDate>(conn)?;

    Ok(days)
}

/// Credits XP to the lifetime, weekly, and per-day ledgers together
///
/// The lifetime/weekly increments are in-place (`xp = xp + ?`) so concurrent
/// credits cannot lose an update; the per-day entry is upserted in the same
/// transaction so the daily ledger can never under-count a credited amount.
#[instrument(skip(pool), fields(user_id = %user_id, amount = %amount, day = %day))]
pub fn credit_xp(pool: &DbPool, user_id: &str, amount: i32, day: NaiveDate) -> Result<()> {
    let conn = &mut pool.get()?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::update(users::table.find(user_id))
            .set((
                users::xp.eq(users::xp + amount),
                users::weekly_xp.eq(users::weekly_xp + amount),
            ))
            .execute(conn)?;

        diesel::insert_into(daily_xp::table)
            .values(DailyXpEntry::new(user_id, day, amount))
            .on_conflict((daily_xp::user_id, daily_xp::day))
            .do_update()
            .set(daily_xp::amount.eq(daily_xp::amount + amount))
            .execute(conn)?;

        Ok(())
    })?;

    debug!("Credited {} XP", amount);
    Ok(())
}

/// XP earned on a given calendar day, or None if no entry exists
pub fn get_daily_xp(pool: &DbPool, user_id: &str, day: NaiveDate) -> Result<Option<i32>> {
    let conn = &mut pool.get()?;

    let amount = daily_xp::table
        .filter(daily_xp::user_id.eq(user_id))
        .filter(daily_xp::day.eq(day))
        .select(daily_xp::amount)
        .first::<i32>(conn)
        .optional()?;

    Ok(amount)
}

/// Top students by weekly XP, highest first
pub fn top_students_by_weekly_xp(pool: &DbPool, limit: i64) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let results = users::table
        .filter(users::role.eq(Role::Student))
        .order_by(users::weekly_xp.desc())
        .limit(limit)
        .load::<User>(conn)?;

    Ok(results)
}

/// Top students by lifetime XP, highest first
pub fn top_students_by_lifetime_xp(pool: &DbPool, limit: i64) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let results = users::table
        .filter(users::role.eq(Role::Student))
        .order_by(users::xp.desc())
        .limit(limit)
        .load::<User>(conn)?;

    Ok(results)
}

/// Applies a promotion to the user's academic profile
///
/// Bumps the semester, stamps the promotion date, and resets the weekly
/// counter. Progress cleanup and group resync are the caller's job
/// (`engine::eligibility::promote_student`).
#[instrument(skip(pool), fields(user_id = %user_id, new_semester = %new_semester))]
pub fn apply_promotion(
    pool: &DbPool,
    user_id: &str,
    new_semester: i32,
    promotion_date: NaiveDate,
) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::update(users::table.find(user_id))
        .set((
            users::semester.eq(new_semester),
            users::last_promotion_date.eq(promotion_date),
            users::weekly_xp.eq(0),
        ))
        .execute(conn)?;

    info!("Promoted user {} to semester {}", user_id, new_semester);
    Ok(())
}

/// Changes a user's degree program
///
/// Group resync is the caller's job (`engine::eligibility::sync_student_groups`).
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn set_user_degree(pool: &DbPool, user_id: &str, degree: Degree) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::update(users::table.find(user_id))
        .set(users::degree.eq(degree))
        .execute(conn)?;

    info!("Changed degree for user {}", user_id);
    Ok(())
}
