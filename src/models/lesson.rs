use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JsonText;

/// Atomic learning content within a module
///
/// Identity is immutable; content may be edited in place. The embedded quiz
/// is opaque to the engines (only pre-assessments are scored server-side).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::lessons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Lesson {
    id: String,

    module_id: String,

    title: String,

    /// Position within the module
    position: i32,

    content: String,

    /// Embedded single-question-set quiz, if any
    quiz: Option<JsonText>,

    created_at: NaiveDateTime,
}

impl Lesson {
    pub fn new(module_id: &str, title: String, position: i32, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            module_id: module_id.to_string(),
            title,
            position,
            content,
            quiz: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_module_id(&self) -> String {
        self.module_id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }
}
