use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl FromSql<Text, Sqlite> for Role {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other).into()),
        }
    }
}

impl ToSql<Text, Sqlite> for Role {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

/// Degree program, stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum Degree {
    #[serde(rename = "BSCS")]
    Bscs,
    #[serde(rename = "BSIT")]
    Bsit,
    #[serde(rename = "BSSE")]
    Bsse,
}

impl Degree {
    pub fn as_str(&self) -> &'static str {
        match self {
            Degree::Bscs => "BSCS",
            Degree::Bsit => "BSIT",
            Degree::Bsse => "BSSE",
        }
    }
}

impl FromSql<Text, Sqlite> for Degree {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "BSCS" => Ok(Degree::Bscs),
            "BSIT" => Ok(Degree::Bsit),
            "BSSE" => Ok(Degree::Bsse),
            other => Err(format!("Unknown degree: {}", other).into()),
        }
    }
}

impl ToSql<Text, Sqlite> for Degree {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

/// A student or admin account
///
/// Streak and XP counters are cached here for O(1) reads; both are always
/// re-derivable from `streak_entries` and `daily_xp`. `semester` only moves
/// forward, and only via promotion.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier (UUID v4 as string)
    id: String,

    /// Unique email address
    email: String,

    name: String,

    role: Role,

    degree: Degree,

    /// Current semester, 1..=8
    semester: i32,

    /// Lifetime XP, monotonic
    xp: i32,

    /// Rolling weekly counter, reset externally
    weekly_xp: i32,

    /// Cached count of distinct active calendar days
    streak_days: i32,

    /// Calendar day of the most recent qualifying activity
    last_study_date: Option<NaiveDate>,

    last_promotion_date: Option<NaiveDate>,

    created_at: NaiveDateTime,
}

impl User {
    pub fn new(email: String, name: String, role: Role, degree: Degree, semester: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            role,
            degree,
            semester,
            xp: 0,
            weekly_xp: 0,
            streak_days: 0,
            last_study_date: None,
            last_promotion_date: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn get_degree(&self) -> Degree {
        self.degree
    }

    pub fn get_semester(&self) -> i32 {
        self.semester
    }

    pub fn get_xp(&self) -> i32 {
        self.xp
    }

    pub fn get_weekly_xp(&self) -> i32 {
        self.weekly_xp
    }

    pub fn get_streak_days(&self) -> i32 {
        self.streak_days
    }

    pub fn get_last_study_date(&self) -> Option<NaiveDate> {
        self.last_study_date
    }

    pub fn get_last_promotion_date(&self) -> Option<NaiveDate> {
        self.last_promotion_date
    }
}

/// One distinct calendar day with qualifying study activity
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::streak_entries)]
pub struct StreakEntry {
    user_id: String,
    day: NaiveDate,
}

impl StreakEntry {
    pub fn new(user_id: &str, day: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            day,
        }
    }

    pub fn get_day(&self) -> NaiveDate {
        self.day
    }
}

/// XP earned on one calendar day
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::daily_xp)]
pub struct DailyXpEntry {
    user_id: String,
    day: NaiveDate,
    amount: i32,
}

impl DailyXpEntry {
    pub fn new(user_id: &str, day: NaiveDate, amount: i32) -> Self {
        Self {
            user_id: user_id.to_string(),
            day,
            amount,
        }
    }

    pub fn get_day(&self) -> NaiveDate {
        self.day
    }

    pub fn get_amount(&self) -> i32 {
        self.amount
    }
}
