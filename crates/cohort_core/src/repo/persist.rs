//! Insert-or-update helpers shared by the repositories.
//!
//! # Invariants
//! - Inserts assign the generated id onto the in-memory entity before returning.
//! - Updates of a missing row fail with `RepoError::NotFound`.
//! - `group_id` is written exactly as given; callers decide link ownership.

use super::queries::{self, Query};
use super::{RepoError, RepoResult};
use crate::model::curator::Curator;
use crate::model::student::Student;
use crate::model::GroupId;
use log::error;
use rusqlite::{params, Connection, OptionalExtension, Params};

pub(super) fn upsert_curator(
    conn: &Connection,
    curator: &mut Curator,
    group_id: Option<GroupId>,
) -> RepoResult<()> {
    match curator.id {
        None => {
            let id = insert_returning_id(
                conn,
                &queries::INSERT_CURATOR,
                "curators",
                params![
                    curator.name.as_str(),
                    curator.email.as_str(),
                    curator.experience,
                    group_id,
                ],
            )?;
            curator.id = Some(id);
        }
        Some(id) => {
            execute_update(
                conn,
                &queries::UPDATE_CURATOR,
                "curator",
                id,
                params![
                    curator.name.as_str(),
                    curator.email.as_str(),
                    curator.experience,
                    group_id,
                    id,
                ],
            )?;
        }
    }
    curator.group_id = group_id;
    Ok(())
}

pub(super) fn upsert_student(
    conn: &Connection,
    student: &mut Student,
    group_id: Option<GroupId>,
) -> RepoResult<()> {
    match student.id {
        None => {
            let id = insert_returning_id(
                conn,
                &queries::INSERT_STUDENT,
                "students",
                params![student.name.as_str(), student.date_of_birth, group_id],
            )?;
            student.id = Some(id);
        }
        Some(id) => {
            execute_update(
                conn,
                &queries::UPDATE_STUDENT,
                "student",
                id,
                params![student.name.as_str(), student.date_of_birth, group_id, id],
            )?;
        }
    }
    student.group_id = group_id;
    Ok(())
}

/// Runs an insert whose statement ends in `RETURNING id`.
///
/// A statement that yields no row is an internal fault, not a data-access
/// failure, and is reported as `MissingGeneratedKey`.
pub(super) fn insert_returning_id(
    conn: &Connection,
    query: &Query,
    table: &'static str,
    params: impl Params,
) -> RepoResult<i64> {
    let mut stmt = conn.prepare_cached(query.sql)?;
    let id = stmt
        .query_row(params, |row| row.get::<_, i64>(0))
        .optional()?;

    id.ok_or_else(|| {
        error!(
            "event=insert module=repo status=error error_code=missing_generated_key query={} table={table}",
            query.name
        );
        RepoError::MissingGeneratedKey(table)
    })
}

pub(super) fn execute_update(
    conn: &Connection,
    query: &Query,
    entity: &'static str,
    id: i64,
    params: impl Params,
) -> RepoResult<()> {
    let changed = conn.prepare_cached(query.sql)?.execute(params)?;
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

pub(super) fn execute_by_id(conn: &Connection, query: &Query, id: i64) -> RepoResult<usize> {
    Ok(conn.prepare_cached(query.sql)?.execute([id])?)
}
