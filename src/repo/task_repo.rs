use crate::db::DbPool;
use crate::models::{Task, TaskDisposition, UserTaskStatus};
use crate::schema::{tasks, user_task_status};
use anyhow::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::debug;

pub fn create_task(pool: &DbPool, title: String, due_date: Option<NaiveDate>) -> Result<Task> {
    let conn = &mut pool.get()?;

    let new_task = Task::new(title, due_date);

    diesel::insert_into(tasks::table)
        .values(new_task.clone())
        .execute(conn)?;

    debug!("Created task with id: {}", new_task.get_id());
    Ok(new_task)
}

pub fn get_task(pool: &DbPool, task_id: &str) -> Result<Option<Task>> {
    let conn = &mut pool.get()?;

    let result = tasks::table
        .find(task_id)
        .first::<Task>(conn)
        .optional()?;

    Ok(result)
}

/// Tasks a student still has pending
///
/// Tasks are shared rows, not copied per user; anything the student has
/// tombstoned (completed or dismissed) is filtered out here.
pub fn pending_tasks(pool: &DbPool, user_id: &str) -> Result<Vec<Task>> {
    let conn = &mut pool.get()?;

    let tombstoned = user_task_status::table
        .filter(user_task_status::user_id.eq(user_id))
        .select(user_task_status::task_id);

    let results = tasks::table
        .filter(tasks::id.ne_all(tombstoned))
        .order_by(tasks::created_at.asc())
        .load::<Task>(conn)?;

    Ok(results)
}

/// Records how a student disposed of a task (upsert; latest disposition wins)
pub fn set_task_status(
    pool: &DbPool,
    user_id: &str,
    task_id: &str,
    disposition: TaskDisposition,
) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::insert_into(user_task_status::table)
        .values(UserTaskStatus::new(user_id, task_id, disposition))
        .on_conflict((user_task_status::user_id, user_task_status::task_id))
        .do_update()
        .set(user_task_status::disposition.eq(disposition))
        .execute(conn)?;

    Ok(())
}

pub fn get_task_status(pool: &DbPool, user_id: &str, task_id: &str) -> Result<Option<UserTaskStatus>> {
    let conn = &mut pool.get()?;

    let result = user_task_status::table
        .find((user_id, task_id))
        .first::<UserTaskStatus>(conn)
        .optional()?;

    Ok(result)
}
