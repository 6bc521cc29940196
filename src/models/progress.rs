use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-(student, course) progress header
///
/// Unique on (user_id, course_id); created lazily on the first
/// progress-affecting event and deleted on promotion or account deletion.
/// The actual completed/unlocked sets live in their own join tables.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::course_progress)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CourseProgress {
    id: String,

    user_id: String,

    course_id: String,

    created_at: NaiveDateTime,
}

impl CourseProgress {
    pub fn new(user_id: &str, course_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_course_id(&self) -> String {
        self.course_id.clone()
    }
}

/// Membership row of the completed-lessons set
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::completed_lessons)]
pub struct CompletedLesson {
    progress_id: String,
    lesson_id: String,
}

impl CompletedLesson {
    pub fn new(progress_id: &str, lesson_id: &str) -> Self {
        Self {
            progress_id: progress_id.to_string(),
            lesson_id: lesson_id.to_string(),
        }
    }

    pub fn get_lesson_id(&self) -> String {
        self.lesson_id.clone()
    }
}

/// Membership row of the unlocked-modules set
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::unlocked_modules)]
pub struct UnlockedModule {
    progress_id: String,
    module_id: String,
}

impl UnlockedModule {
    pub fn new(progress_id: &str, module_id: &str) -> Self {
        Self {
            progress_id: progress_id.to_string(),
            module_id: module_id.to_string(),
        }
    }

    pub fn get_module_id(&self) -> String {
        self.module_id.clone()
    }
}
