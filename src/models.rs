/// Data models module
///
/// One file per entity. All structs map 1:1 onto the diesel schema; set-like
/// attributes (completed lessons, unlocked modules, group members, streak
/// history) are modeled as join-table rows with composite primary keys.

mod course;
mod group;
mod json_text;
mod lesson;
mod module;
mod progress;
mod task;
mod user;

pub use course::{Course, CourseProgram};
pub use group::{CourseGroup, CourseGroupMember};
pub use json_text::JsonText;
pub use lesson::Lesson;
pub use module::{CourseModule, Question};
pub use progress::{CompletedLesson, CourseProgress, UnlockedModule};
pub use task::{Task, TaskDisposition, UserTaskStatus};
pub use user::{DailyXpEntry, Degree, Role, StreakEntry, User};
