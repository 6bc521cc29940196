use crate::db::DbPool;
use crate::models::{CourseGroup, CourseGroupMember};
use crate::schema::{course_group_members, course_groups};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

pub fn get_group(pool: &DbPool, course_code: &str) -> Result<Option<CourseGroup>> {
    let conn = &mut pool.get()?;

    let result = course_groups::table
        .find(course_code)
        .first::<CourseGroup>(conn)
        .optional()?;

    Ok(result)
}

/// Creates or refreshes a group header, stamping the rule snapshot
pub fn upsert_group(pool: &DbPool, group: &CourseGroup) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::insert_into(course_groups::table)
        .values(group.clone())
        .on_conflict(course_groups::course_code)
        .do_update()
        .set((
            course_groups::programs_snapshot.eq(group.get_programs_snapshot()),
            course_groups::semester_snapshot.eq(group.get_semester_snapshot()),
            course_groups::synced_at.eq(group.get_synced_at()),
        ))
        .execute(conn)?;

    Ok(())
}

/// Replaces a group's membership wholesale (full recompute, not a diff)
///
/// Header upsert, member delete, and member insert land in one transaction
/// so a concurrent reader never sees a half-replaced group. Two concurrent
/// recomputes for the same course race benignly: last writer wins.
#[instrument(skip(pool, group, user_ids), fields(course_code = %group.get_course_code(), members = user_ids.len()))]
pub fn replace_group(pool: &DbPool, group: &CourseGroup, user_ids: &[String]) -> Result<()> {
    let conn = &mut pool.get()?;
    let course_code = group.get_course_code();

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::insert_into(course_groups::table)
            .values(group.clone())
            .on_conflict(course_groups::course_code)
            .do_update()
            .set((
                course_groups::programs_snapshot.eq(group.get_programs_snapshot()),
                course_groups::semester_snapshot.eq(group.get_semester_snapshot()),
                course_groups::synced_at.eq(group.get_synced_at()),
            ))
            .execute(conn)?;

        diesel::delete(
            course_group_members::table.filter(course_group_members::course_code.eq(&course_code)),
        )
        .execute(conn)?;

        for user_id in user_ids {
            diesel::insert_into(course_group_members::table)
                .values(CourseGroupMember::new(&course_code, user_id))
                .execute(conn)?;
        }

        Ok(())
    })?;

    debug!("Replaced group {} with {} member(s)", course_code, user_ids.len());
    Ok(())
}

/// Adds one student to a group (add-to-set, idempotent)
pub fn add_member(pool: &DbPool, course_code: &str, user_id: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::insert_into(course_group_members::table)
        .values(CourseGroupMember::new(course_code, user_id))
        .on_conflict_do_nothing()
        .execute(conn)?;

    Ok(())
}

/// Pulls a student out of every group not in the given set of codes
///
/// Idempotent no-op for groups the student was never in.
pub fn remove_member_except(pool: &DbPool, user_id: &str, keep_codes: &[String]) -> Result<usize> {
    let conn = &mut pool.get()?;

    let removed = diesel::delete(
        course_group_members::table
            .filter(course_group_members::user_id.eq(user_id))
            .filter(course_group_members::course_code.ne_all(keep_codes)),
    )
    .execute(conn)?;

    debug!("Removed user {} from {} group(s)", user_id, removed);
    Ok(removed)
}

/// The studentIds set of a group
pub fn member_ids(pool: &DbPool, course_code: &str) -> Result<Vec<String>> {
    let conn = &mut pool.get()?;

    let ids = course_group_members::table
        .filter(course_group_members::course_code.eq(course_code))
        .select(course_group_members::user_id)
        .load::<String>(conn)?;

    Ok(ids)
}

pub fn member_count(pool: &DbPool, course_code: &str) -> Result<usize> {
    let conn = &mut pool.get()?;

    let count: i64 = course_group_members::table
        .filter(course_group_members::course_code.eq(course_code))
        .count()
        .get_result(conn)?;

    Ok(count as usize)
}

/// All group codes a student is currently visible through
pub fn groups_for_member(pool: &DbPool, user_id: &str) -> Result<Vec<String>> {
    let conn = &mut pool.get()?;

    let codes = course_group_members::table
        .filter(course_group_members::user_id.eq(user_id))
        .select(course_group_members::course_code)
        .load::<String>(conn)?;

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Degree;
    use crate::repo::tests::setup_test_db;

    #[test]
    fn test_replace_group_overwrites_prior_state() {
        let pool = setup_test_db();
        let group = CourseGroup::new("CS201", &[Degree::Bscs], 2);

        replace_group(&pool, &group, &["u1".to_string(), "u2".to_string()]).unwrap();
        replace_group(&pool, &group, &["u3".to_string()]).unwrap();

        let members = member_ids(&pool, "CS201").unwrap();
        assert_eq!(members, vec!["u3".to_string()]);
        assert_eq!(member_count(&pool, "CS201").unwrap(), 1);
    }

    #[test]
    fn test_upsert_group_refreshes_snapshot() {
        let pool = setup_test_db();
        upsert_group(&pool, &CourseGroup::new("CS201", &[Degree::Bscs], 2)).unwrap();
        upsert_group(&pool, &CourseGroup::new("CS201", &[Degree::Bsit], 3)).unwrap();

        let group = get_group(&pool, "CS201").unwrap().unwrap();
        assert_eq!(group.get_semester_snapshot(), 3);
        assert_eq!(group.get_programs_snapshot().0, serde_json::json!(["BSIT"]));
    }

    #[test]
    fn test_add_member_idempotent() {
        let pool = setup_test_db();
        upsert_group(&pool, &CourseGroup::new("CS201", &[Degree::Bscs], 2)).unwrap();

        add_member(&pool, "CS201", "u1").unwrap();
        add_member(&pool, "CS201", "u1").unwrap();

        assert_eq!(member_count(&pool, "CS201").unwrap(), 1);
    }

    #[test]
    fn test_remove_member_except_keeps_listed_groups() {
        let pool = setup_test_db();
        upsert_group(&pool, &CourseGroup::new("CS201", &[Degree::Bscs], 2)).unwrap();
        upsert_group(&pool, &CourseGroup::new("CS202", &[Degree::Bscs], 2)).unwrap();
        add_member(&pool, "CS201", "u1").unwrap();
        add_member(&pool, "CS202", "u1").unwrap();

        let removed = remove_member_except(&pool, "u1", &["CS202".to_string()]).unwrap();
        assert_eq!(removed, 1);

        assert_eq!(groups_for_member(&pool, "u1").unwrap(), vec!["CS202".to_string()]);

        // Absent membership: idempotent no-op
        let removed_again = remove_member_except(&pool, "u1", &["CS202".to_string()]).unwrap();
        assert_eq!(removed_again, 0);
    }
}
