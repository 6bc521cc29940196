use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared task visible to all students
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Task {
    id: String,

    title: String,

    due_date: Option<NaiveDate>,

    created_at: NaiveDateTime,
}

impl Task {
    pub fn new(title: String, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            due_date,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }
}

/// How a student disposed of a task, stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum TaskDisposition {
    Completed,
    Deleted,
}

impl TaskDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskDisposition::Completed => "completed",
            TaskDisposition::Deleted => "deleted",
        }
    }
}

impl FromSql<Text, Sqlite> for TaskDisposition {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "completed" => Ok(TaskDisposition::Completed),
            "deleted" => Ok(TaskDisposition::Deleted),
            other => Err(format!("Unknown task disposition: {}", other).into()),
        }
    }
}

impl ToSql<Text, Sqlite> for TaskDisposition {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

/// Per-(student, task) tombstone
///
/// Tasks are not copied per user; this marker is what keeps a completed or
/// dismissed task out of that student's pending list.
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::user_task_status)]
pub struct UserTaskStatus {
    user_id: String,
    task_id: String,
    disposition: TaskDisposition,
}

impl UserTaskStatus {
    pub fn new(user_id: &str, task_id: &str, disposition: TaskDisposition) -> Self {
        Self {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
            disposition,
        }
    }

    pub fn get_task_id(&self) -> String {
        self.task_id.clone()
    }

    pub fn get_disposition(&self) -> TaskDisposition {
        self.disposition
    }
}
