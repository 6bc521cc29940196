use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Degree;

/// A catalog subject
///
/// Owns its modules (and, transitively, lessons and questions); deleting a
/// course cascades down the whole tree.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Course {
    id: String,

    /// Unique course code, the key the eligibility groups hang off
    code: String,

    title: String,

    /// Semester in which the course is offered
    semester: i32,

    created_at: NaiveDateTime,
}

impl Course {
    pub fn new(code: String, title: String, semester: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code,
            title,
            semester,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_code(&self) -> String {
        self.code.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_semester(&self) -> i32 {
        self.semester
    }
}

/// One entry of a course's allowed-programs set
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::course_programs)]
pub struct CourseProgram {
    course_id: String,
    degree: Degree,
}

impl CourseProgram {
    pub fn new(course_id: &str, degree: Degree) -> Self {
        Self {
            course_id: course_id.to_string(),
            degree,
        }
    }

    pub fn get_degree(&self) -> Degree {
        self.degree
    }
}
