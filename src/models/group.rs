use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Degree, JsonText};

/// Materialized eligibility view header, keyed by course code
///
/// Not authoritative: always re-derivable from User x Course. The snapshot
/// fields record the rule the membership was computed from, and `synced_at`
/// records when.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::course_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CourseGroup {
    course_code: String,

    /// Allowed programs the membership was computed from, as a JSON array
    programs_snapshot: JsonText,

    /// Course semester the membership was computed from
    semester_snapshot: i32,

    synced_at: NaiveDateTime,
}

impl CourseGroup {
    pub fn new(course_code: &str, programs: &[Degree], semester: i32) -> Self {
        let codes: Vec<&str> = programs.iter().map(|d| d.as_str()).collect();
        Self {
            course_code: course_code.to_string(),
            programs_snapshot: JsonText(serde_json::json!(codes)),
            semester_snapshot: semester,
            synced_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_course_code(&self) -> String {
        self.course_code.clone()
    }

    pub fn get_programs_snapshot(&self) -> JsonText {
        self.programs_snapshot.clone()
    }

    pub fn get_semester_snapshot(&self) -> i32 {
        self.semester_snapshot
    }

    pub fn get_synced_at(&self) -> NaiveDateTime {
        self.synced_at
    }
}

/// One student visible through a course group
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::course_group_members)]
pub struct CourseGroupMember {
    course_code: String,
    user_id: String,
}

impl CourseGroupMember {
    pub fn new(course_code: &str, user_id: &str) -> Self {
        Self {
            course_code: course_code.to_string(),
            user_id: user_id.to_string(),
        }
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }
}
