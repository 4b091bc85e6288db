//! Group repository: the owner of all group/curator/student links.
//!
//! # Responsibility
//! - Compose joined group/curator reads with per-group student reads.
//! - Cascade saves into the curator and every student of a group.
//! - Detach children before deleting a group row.
//!
//! # Invariants
//! - Loaded and saved groups satisfy `Group::is_consistent()`.
//! - Saving an existing group first detaches every curator and student row
//!   linked to it, then re-attaches exactly the children held in memory.
//! - Save and remove run inside one immediate transaction per call.

use super::persist::{execute_by_id, execute_update, insert_returning_id, upsert_curator, upsert_student};
use super::queries;
use super::rows::{read_joined_curator, read_joined_group, read_student};
use super::{Records, RepoError, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::group::Group;
use crate::model::GroupId;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashSet;
use std::time::Instant;

/// Repository interface for groups and their cascaded children.
pub trait GroupRepository {
    /// Loads every group with its curator and students.
    fn find_all(&self) -> RepoResult<Records<Group>>;
    /// Loads one group with its curator and students.
    fn find_by_id(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Resolves the unique group name to an id, then loads like `find_by_id`.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Group>>;
    /// Inserts (no id) or updates (id) the group and cascades into children.
    fn save(&self, group: Group) -> RepoResult<Group>;
    /// Detaches children, deletes the group and returns its last loaded state.
    fn remove_by_id(&self, id: GroupId) -> RepoResult<Option<Group>>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'p> {
    provider: &'p ConnectionProvider,
}

impl<'p> SqliteGroupRepository<'p> {
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self { provider }
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn find_all(&self) -> RepoResult<Records<Group>> {
        self.provider.with_connection(|conn| {
            let mut groups = Vec::new();
            {
                let mut stmt = conn.prepare_cached(queries::SELECT_GROUPS_WITH_CURATORS.sql)?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    let mut group = read_joined_group(row)?;
                    group.curator = read_joined_curator(row)?;
                    groups.push(group);
                }
            }

            for group in &mut groups {
                load_students(conn, group)?;
            }

            debug!(
                "event=group_find_all module=repo status=ok groups={}",
                groups.len()
            );
            Ok(Records::new(groups))
        })
    }

    fn find_by_id(&self, id: GroupId) -> RepoResult<Option<Group>> {
        self.provider.with_connection(|conn| load_group(conn, id))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Group>> {
        let id: Option<GroupId> = self.provider.with_connection(|conn| {
            let id = conn
                .prepare_cached(queries::SELECT_GROUP_ID_BY_NAME.sql)?
                .query_row([name], |row| row.get(0))
                .optional()?;
            Ok::<_, RepoError>(id)
        })?;

        match id {
            Some(id) => self.find_by_id(id),
            None => Ok(None),
        }
    }

    fn save(&self, mut group: Group) -> RepoResult<Group> {
        ensure_unique_student_ids(&group)?;

        let started_at = Instant::now();
        let path = if group.id.is_some() { "update" } else { "insert" };

        self.provider.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let group_id = match group.id {
                None => {
                    let id = insert_returning_id(
                        &tx,
                        &queries::INSERT_GROUP,
                        "study_groups",
                        params![group.name.as_str(), group.graduation_date],
                    )?;
                    group.id = Some(id);
                    id
                }
                Some(id) => {
                    execute_update(
                        &tx,
                        &queries::UPDATE_GROUP,
                        "group",
                        id,
                        params![group.name.as_str(), group.graduation_date, id],
                    )?;
                    execute_by_id(&tx, &queries::DETACH_CURATORS_BY_GROUP_ID, id)?;
                    execute_by_id(&tx, &queries::DETACH_STUDENTS_BY_GROUP_ID, id)?;
                    id
                }
            };

            if let Some(curator) = group.curator.as_mut() {
                upsert_curator(&tx, curator, Some(group_id))?;
            }
            for student in &mut group.students {
                upsert_student(&tx, student, Some(group_id))?;
            }

            tx.commit()?;
            Ok::<_, RepoError>(())
        })?;

        group.rewire();
        debug!(
            "event=group_save module=repo status=ok path={path} group_id={} has_curator={} students={} duration_ms={}",
            group.id.unwrap_or_default(),
            group.curator.is_some(),
            group.students.len(),
            started_at.elapsed().as_millis()
        );
        Ok(group)
    }

    fn remove_by_id(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let Some(group) = self.find_by_id(id)? else {
            return Ok(None);
        };

        self.provider.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let curators = execute_by_id(&tx, &queries::DETACH_CURATORS_BY_GROUP_ID, id)?;
            let students = execute_by_id(&tx, &queries::DETACH_STUDENTS_BY_GROUP_ID, id)?;
            execute_by_id(&tx, &queries::DELETE_GROUP_BY_ID, id)?;
            tx.commit()?;

            debug!(
                "event=group_remove module=repo status=ok group_id={id} detached_curators={curators} detached_students={students}"
            );
            Ok::<_, RepoError>(())
        })?;

        Ok(Some(group))
    }
}

fn load_group(conn: &Connection, id: GroupId) -> RepoResult<Option<Group>> {
    let mut group = {
        let mut stmt = conn.prepare_cached(queries::SELECT_GROUP_WITH_CURATOR_BY_ID.sql)?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut group = read_joined_group(row)?;
        group.curator = read_joined_curator(row)?;
        group
    };

    load_students(conn, &mut group)?;
    Ok(Some(group))
}

fn load_students(conn: &Connection, group: &mut Group) -> RepoResult<()> {
    let Some(group_id) = group.id else {
        return Ok(());
    };

    let mut stmt = conn.prepare_cached(queries::SELECT_STUDENTS_BY_GROUP_ID.sql)?;
    let mut rows = stmt.query([group_id])?;
    while let Some(row) = rows.next()? {
        group.students.push(read_student(row)?);
    }
    group.rewire();
    Ok(())
}

fn ensure_unique_student_ids(group: &Group) -> RepoResult<()> {
    let mut seen = HashSet::new();
    for id in group.students.iter().filter_map(|student| student.id) {
        if !seen.insert(id) {
            return Err(RepoError::InvalidArgument(format!(
                "student {id} appears more than once in group `{}`",
                group.name
            )));
        }
    }
    Ok(())
}
