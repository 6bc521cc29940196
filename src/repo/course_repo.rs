use crate::db::DbPool;
use crate::models::{Course, CourseModule, CourseProgram, Degree, Lesson, Question};
use crate::schema::{course_programs, courses, lessons, modules, questions};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a course together with its allowed-programs set
#[instrument(skip(pool, programs), fields(code = %code))]
pub fn create_course(
    pool: &DbPool,
    code: String,
    title: String,
    semester: i32,
    programs: &[Degree],
) -> Result<Course> {
    debug!("Creating new course");
    let conn = &mut pool.get()?;

    let new_course = Course::new(code, title, semester);

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::insert_into(courses::table)
            .values(new_course.clone())
            .execute(conn)?;

        for degree in programs {
            diesel::insert_into(course_programs::table)
                .values(CourseProgram::new(&new_course.get_id(), *degree))
                .execute(conn)?;
        }

        Ok(())
    })?;

    info!("Created course with id: {}", new_course.get_id());
    Ok(new_course)
}

pub fn get_course(pool: &DbPool, course_id: &str) -> Result<Option<Course>> {
    let conn = &mut pool.get()?;

    let result = courses::table
        .find(course_id)
        .first::<Course>(conn)
        .optional()?;

    Ok(result)
}

/// The allowed-programs set for a course
pub fn get_course_programs(pool: &DbPool, course_id: &str) -> Result<Vec<Degree>> {
    let conn = &mut pool.get()?;

    let programs = course_programs::table
        .filter(course_programs::course_id.eq(course_id))
        .load::<CourseProgram>(conn)?;

    Ok(programs.iter().map(|p| p.get_degree()).collect())
}

/// Rewrites a course's eligibility rule (semester + allowed-programs)
///
/// The caller is responsible for triggering `sync_course_group` afterwards;
/// this only mutates the authoritative course definition.
#[instrument(skip(pool, programs), fields(course_id = %course_id, semester = %semester))]
pub fn set_course_eligibility(
    pool: &DbPool,
    course_id: &str,
    semester: i32,
    programs: &[Degree],
) -> Result<()> {
    let conn = &mut pool.get()?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::update(courses::table.find(course_id))
            .set(courses::semester.eq(semester))
            .execute(conn)?;

        diesel::delete(course_programs::table.filter(course_programs::course_id.eq(course_id)))
            .execute(conn)?;

        for degree in programs {
            diesel::insert_into(course_programs::table)
                .values(CourseProgram::new(course_id, *degree))
                .execute(conn)?;
        }

        Ok(())
    })?;

    info!("Updated eligibility rule for course {}", course_id);
    Ok(())
}

pub fn delete_course(pool: &DbPool, course_id: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::delete(courses::table.find(course_id)).execute(conn)?;

    info!("Deleted course {}", course_id);
    Ok(())
}

/// Creates a module within a course
///
/// `passing_percentage` is only meaningful for modules that also get
/// questions; together they form the module's pre-assessment.
#[instrument(skip(pool), fields(course_id = %course_id, position = %position))]
pub fn create_module(
    pool: &DbPool,
    course_id: &str,
    title: String,
    position: i32,
    passing_percentage: Option<i32>,
) -> Result<CourseModule> {
    let conn = &mut pool.get()?;

    let new_module = CourseModule::new(course_id, title, position, passing_percentage);

    diesel::insert_into(modules::table)
        .values(new_module.clone())
        .execute(conn)?;

    debug!("Created module with id: {}", new_module.get_id());
    Ok(new_module)
}

pub fn get_module(pool: &DbPool, module_id: &str) -> Result<Option<CourseModule>> {
    let conn = &mut pool.get()?;

    let result = modules::table
        .find(module_id)
        .first::<CourseModule>(conn)
        .optional()?;

    Ok(result)
}

/// All modules of a course, in curriculum order
pub fn list_modules_for_course(pool: &DbPool, course_id: &str) -> Result<Vec<CourseModule>> {
    let conn = &mut pool.get()?;

    let results = modules::table
        .filter(modules::course_id.eq(course_id))
        .order_by(modules::position.asc())
        .load::<CourseModule>(conn)?;

    Ok(results)
}

/// Adds a pre-assessment question to a module
pub fn add_question(
    pool: &DbPool,
    module_id: &str,
    position: i32,
    prompt: String,
    options: Vec<String>,
    correct_answer: i32,
) -> Result<Question> {
    let conn = &mut pool.get()?;

    let new_question = Question::new(module_id, position, prompt, options, correct_answer);

    diesel::insert_into(questions::table)
        .values(new_question.clone())
        .execute(conn)?;

    Ok(new_question)
}

/// All pre-assessment questions of a module, in question order
pub fn list_questions_for_module(pool: &DbPool, module_id: &str) -> Result<Vec<Question>> {
    let conn = &mut pool.get()?;

    let results = questions::table
        .filter(questions::module_id.eq(module_id))
        .order_by(questions::position.asc())
        .load::<Question>(conn)?;

    Ok(results)
}

/// Creates a lesson within a module
pub fn create_lesson(
    pool: &DbPool,
    module_id: &str,
    title: String,
    position: i32,
    content: String,
) -> Result<Lesson> {
    let conn = &mut pool.get()?;

    let new_lesson = Lesson::new(module_id, title, position, content);

    diesel::insert_into(lessons::table)
        .values(new_lesson.clone())
        .execute(conn)?;

    debug!("Created lesson with id: {}", new_lesson.get_id());
    Ok(new_lesson)
}

pub fn get_lesson(pool: &DbPool, lesson_id: &str) -> Result<Option<Lesson>> {
    let conn = &mut pool.get()?;

    let result = lessons::table
        .find(lesson_id)
        .first::<Lesson>(conn)
        .optional()?;

    Ok(result)
}

/// All courses a student profile is eligible for
///
/// The other direction of the eligibility predicate: courses offered in the
/// student's semester whose allowed-programs contain the student's degree.
pub fn list_courses_for_profile(pool: &DbPool, semester: i32, degree: Degree) -> Result<Vec<Course>> {
    let conn = &mut pool.get()?;

    let results = courses::table
        .inner_join(course_programs::table)
        .filter(courses::semester.eq(semester))
        .filter(course_programs::degree.eq(degree))
        .select(Course::as_select())
        .load::<Course>(conn)?;

    Ok(results)
}

/// All lessons of a module, in lesson order
pub fn list_lessons_for_module(pool: &DbPool, module_id: &str) -> Result<Vec<Lesson>> {
    let conn = &mut pool.get()?;

    let results = lessons::table
        .filter(lessons::module_id.eq(module_id))
        .order_by(lessons::position.asc())
        .load::<Lesson>(conn)?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::tests::setup_test_db;

    #[test]
    fn test_create_course_with_programs() {
        let pool = setup_test_db();
        let course = create_course(
            &pool,
            "CS201".to_string(),
            "Data Structures".to_string(),
            2,
            &[Degree::Bscs, Degree::Bsse],
        )
        .unwrap();

        let fetched = get_course(&pool, &course.get_id()).unwrap().unwrap();
        assert_eq!(fetched.get_code(), "CS201");
        assert_eq!(fetched.get_semester(), 2);

        let mut programs = get_course_programs(&pool, &course.get_id()).unwrap();
        programs.sort_by_key(|d| d.as_str());
        assert_eq!(programs, vec![Degree::Bscs, Degree::Bsse]);
    }

    #[test]
    fn test_set_course_eligibility_replaces_rule() {
        let pool = setup_test_db();
        let course = create_course(
            &pool,
            "CS101".to_string(),
            "Intro".to_string(),
            1,
            &[Degree::Bscs],
        )
        .unwrap();

        set_course_eligibility(&pool, &course.get_id(), 2, &[Degree::Bsit]).unwrap();

        let fetched = get_course(&pool, &course.get_id()).unwrap().unwrap();
        assert_eq!(fetched.get_semester(), 2);
        assert_eq!(get_course_programs(&pool, &course.get_id()).unwrap(), vec![Degree::Bsit]);
    }

    #[test]
    fn test_modules_ordered_by_position() {
        let pool = setup_test_db();
        let course = create_course(&pool, "CS102".to_string(), "Algo".to_string(), 1, &[Degree::Bscs]).unwrap();

        let m1 = create_module(&pool, &course.get_id(), "Sorting".to_string(), 1, Some(60)).unwrap();
        let m0 = create_module(&pool, &course.get_id(), "Basics".to_string(), 0, None).unwrap();

        let listed = list_modules_for_course(&pool, &course.get_id()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].get_id(), m0.get_id());
        assert_eq!(listed[1].get_id(), m1.get_id());
    }

    #[test]
    fn test_questions_and_lessons_ordered() {
        let pool = setup_test_db();
        let course = create_course(&pool, "CS103".to_string(), "DB".to_string(), 1, &[Degree::Bscs]).unwrap();
        let module = create_module(&pool, &course.get_id(), "SQL".to_string(), 1, Some(50)).unwrap();

        add_question(
            &pool,
            &module.get_id(),
            1,
            "Second?".to_string(),
            vec!["a".to_string(), "b".to_string()],
            1,
        )
        .unwrap();
        add_question(
            &pool,
            &module.get_id(),
            0,
            "First?".to_string(),
            vec!["a".to_string(), "b".to_string()],
            0,
        )
        .unwrap();

        let listed = list_questions_for_module(&pool, &module.get_id()).unwrap();
        assert_eq!(listed[0].get_position(), 0);
        assert_eq!(listed[1].get_position(), 1);
        assert_eq!(listed[0].option_count(), 2);

        create_lesson(&pool, &module.get_id(), "Joins".to_string(), 1, "...".to_string()).unwrap();
        create_lesson(&pool, &module.get_id(), "Select".to_string(), 0, "...".to_string()).unwrap();
        let lessons = list_lessons_for_module(&pool, &module.get_id()).unwrap();
        assert_eq!(lessons[0].get_position(), 0);
        assert_eq!(lessons[1].get_position(), 1);
    }

    #[test]
    fn test_delete_course_cascades_to_modules_and_lessons() {
        let pool = setup_test_db();
        let course = create_course(&pool, "CS104".to_string(), "OS".to_string(), 1, &[Degree::Bscs]).unwrap();
        let module = create_module(&pool, &course.get_id(), "Procs".to_string(), 0, None).unwrap();
        let lesson = create_lesson(&pool, &module.get_id(), "Fork".to_string(), 0, "...".to_string()).unwrap();

        delete_course(&pool, &course.get_id()).unwrap();

        assert!(get_course(&pool, &course.get_id()).unwrap().is_none());
        assert!(get_module(&pool, &module.get_id()).unwrap().is_none());
        assert!(get_lesson(&pool, &lesson.get_id()).unwrap().is_none());
        assert!(get_course_programs(&pool, &course.get_id()).unwrap().is_empty());
    }
}
