use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JsonText;

/// An ordered curriculum unit within a course
///
/// A module carries a pre-assessment iff `passing_percentage` is set and it
/// owns at least one question. Passing that pre-assessment is the only way a
/// module is unlocked out of sequence.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::modules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CourseModule {
    id: String,

    course_id: String,

    title: String,

    /// Position within the course; position 0 is always unlocked
    position: i32,

    /// Pass threshold for the pre-assessment, as a percentage
    passing_percentage: Option<i32>,

    created_at: NaiveDateTime,
}

impl CourseModule {
    pub fn new(course_id: &str, title: String, position: i32, passing_percentage: Option<i32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title,
            position,
            passing_percentage,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_course_id(&self) -> String {
        self.course_id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }

    pub fn get_passing_percentage(&self) -> Option<i32> {
        self.passing_percentage
    }
}

/// A single pre-assessment question
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Question {
    id: String,

    module_id: String,

    /// Position within the pre-assessment; answers are keyed by this index
    position: i32,

    prompt: String,

    /// Answer options as a JSON array of strings
    options: JsonText,

    /// Index into `options` of the correct answer
    correct_answer: i32,
}

impl Question {
    pub fn new(module_id: &str, position: i32, prompt: String, options: Vec<String>, correct_answer: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            module_id: module_id.to_string(),
            position,
            prompt,
            options: JsonText(serde_json::json!(options)),
            correct_answer,
        }
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }

    pub fn get_correct_answer(&self) -> i32 {
        self.correct_answer
    }

    /// Number of answer options, for permissive bounds-checking of submissions
    pub fn option_count(&self) -> usize {
        self.options.0.as_array().map_or(0, |a| a.len())
    }
}
