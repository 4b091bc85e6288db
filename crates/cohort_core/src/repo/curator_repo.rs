//! Curator repository.
//!
//! # Responsibility
//! - Read and write curator scalar fields.
//! - Route every grouped curator through the group repository.
//!
//! # Invariants
//! - This repository only writes `curators.group_id = NULL`; assigning a
//!   curator to a group saves that whole group through `GroupRepository`.
//! - A grouped curator is returned from its loaded group, so its
//!   back-reference matches what `GroupRepository::find_by_id` reports.

use super::group_repo::GroupRepository;
use super::persist::{execute_by_id, upsert_curator};
use super::queries;
use super::rows::read_curator;
use super::{Records, RepoError, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::curator::Curator;
use crate::model::CuratorId;
use log::debug;

/// Repository interface for curator CRUD operations.
pub trait CuratorRepository {
    /// Unassigned curators followed by the curator of every group.
    fn find_all(&self) -> RepoResult<Records<Curator>>;
    fn find_by_id(&self, id: CuratorId) -> RepoResult<Option<Curator>>;
    /// Saves the row directly when unassigned; otherwise saves the whole
    /// group named by `curator.group_id` with this curator attached.
    fn save(&self, curator: Curator) -> RepoResult<Curator>;
    /// Deletes only the curator row.
    fn remove_by_id(&self, id: CuratorId) -> RepoResult<Option<Curator>>;
}

/// SQLite-backed curator repository delegating link changes to `G`.
pub struct SqliteCuratorRepository<'p, G> {
    provider: &'p ConnectionProvider,
    groups: &'p G,
}

impl<'p, G: GroupRepository> SqliteCuratorRepository<'p, G> {
    pub fn new(provider: &'p ConnectionProvider, groups: &'p G) -> Self {
        Self { provider, groups }
    }

    fn load_row(&self, id: CuratorId) -> RepoResult<Option<Curator>> {
        self.provider.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(queries::SELECT_CURATOR_BY_ID.sql)?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Ok(Some(read_curator(row)?)),
                None => Ok(None),
            }
        })
    }
}

impl<G: GroupRepository> CuratorRepository for SqliteCuratorRepository<'_, G> {
    fn find_all(&self) -> RepoResult<Records<Curator>> {
        let mut curators = self.provider.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(queries::SELECT_CURATORS_WITHOUT_GROUP.sql)?;
            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(read_curator(row)?);
            }
            Ok::<_, RepoError>(items)
        })?;

        curators.extend(self.groups.find_all()?.filter_map(|group| group.curator));
        Ok(Records::new(curators))
    }

    fn find_by_id(&self, id: CuratorId) -> RepoResult<Option<Curator>> {
        let Some(row) = self.load_row(id)? else {
            return Ok(None);
        };
        let Some(group_id) = row.group_id else {
            return Ok(Some(row));
        };

        // The group may have changed between the two reads; fall back to the row.
        let from_group = self
            .groups
            .find_by_id(group_id)?
            .and_then(|group| group.curator)
            .filter(|curator| curator.id == Some(id));
        Ok(Some(from_group.unwrap_or(row)))
    }

    fn save(&self, mut curator: Curator) -> RepoResult<Curator> {
        let Some(group_id) = curator.group_id else {
            self.provider.with_connection(|conn| upsert_curator(conn, &mut curator, None))?;
            debug!(
                "event=curator_save module=repo status=ok path=direct curator_id={}",
                curator.id.unwrap_or_default()
            );
            return Ok(curator);
        };

        let mut group = self.groups.find_by_id(group_id)?.ok_or_else(|| {
            RepoError::InvalidArgument(format!("curator references unknown group {group_id}"))
        })?;
        group.set_curator(Some(curator));
        let saved = self.groups.save(group)?;

        debug!("event=curator_save module=repo status=ok path=group_cascade group_id={group_id}");
        saved.curator.ok_or_else(|| {
            RepoError::InvalidData(format!("group {group_id} lost its curator during save"))
        })
    }

    fn remove_by_id(&self, id: CuratorId) -> RepoResult<Option<Curator>> {
        let Some(curator) = self.find_by_id(id)? else {
            return Ok(None);
        };
        self.provider
            .with_connection(|conn| execute_by_id(conn, &queries::DELETE_CURATOR_BY_ID, id))?;
        debug!("event=curator_remove module=repo status=ok curator_id={id}");
        Ok(Some(curator))
    }
}
