//! Row readers shared by the repositories.

use super::{RepoError, RepoResult};
use crate::model::curator::Curator;
use crate::model::group::Group;
use crate::model::student::Student;
use rusqlite::Row;

/// Reads the group side of a group/curator joined row.
///
/// The returned group has no curator and no students yet.
pub(super) fn read_joined_group(row: &Row<'_>) -> RepoResult<Group> {
    Ok(Group {
        id: Some(row.get("group_id")?),
        name: row.get("group_name")?,
        graduation_date: row.get("group_graduation_date")?,
        curator: None,
        students: Vec::new(),
    })
}

/// Reads the curator side of a group/curator joined row.
///
/// Returns `None` when the outer join found no curator, detected by a null
/// `curator_id` rather than a zero value.
pub(super) fn read_joined_curator(row: &Row<'_>) -> RepoResult<Option<Curator>> {
    let Some(id) = row.get::<_, Option<i64>>("curator_id")? else {
        return Ok(None);
    };
    Ok(Some(Curator {
        id: Some(id),
        name: row.get("curator_name")?,
        email: row.get("curator_email")?,
        experience: experience_from_db(row.get("curator_experience")?)?,
        group_id: Some(row.get("group_id")?),
    }))
}

pub(super) fn read_curator(row: &Row<'_>) -> RepoResult<Curator> {
    Ok(Curator {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
        experience: experience_from_db(row.get("experience")?)?,
        group_id: row.get("group_id")?,
    })
}

pub(super) fn read_student(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        date_of_birth: row.get("date_of_birth")?,
        group_id: row.get("group_id")?,
    })
}

fn experience_from_db(value: i64) -> RepoResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid experience value `{value}` in curators.experience"
        ))
    })
}
