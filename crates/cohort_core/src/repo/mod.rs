//! Cascading repositories for groups, curators and students.
//!
//! # Responsibility
//! - Read and write the three record tables through the query catalog.
//! - Keep group/curator/student links consistent in memory and in storage.
//!
//! # Invariants
//! - `SqliteGroupRepository` is the only writer of `group_id` foreign keys
//!   for grouped children; the curator and student repositories delegate to it.
//! - Missing rows are `Ok(None)`; failures are `RepoError`.
//! - Every public operation leases its own connection and releases it on return.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod curator_repo;
pub mod group_repo;
mod persist;
pub mod queries;
mod rows;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure raised by repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input rejected before any statement ran.
    InvalidArgument(String),
    /// Data-access failure; carries the underlying SQLite or bootstrap cause.
    Db(DbError),
    /// Update targeted an id with no row behind it.
    NotFound { entity: &'static str, id: i64 },
    /// An insert produced no generated key. Internal fault, never retried.
    MissingGeneratedKey(&'static str),
    /// Persisted row cannot form a valid entity.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this is a wrapped data-access failure.
    pub fn is_data_access(&self) -> bool {
        matches!(self, Self::Db(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Db(err) => write!(f, "data access failure: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingGeneratedKey(table) => {
                write!(f, "insert into `{table}` returned no generated key")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidArgument(_) => None,
            Self::NotFound { .. } => None,
            Self::MissingGeneratedKey(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One-pass sequence of records produced by a `find_all` call.
///
/// Rows are read while the connection lease is held; the lease is released
/// before the sequence is handed out. Not restartable.
#[derive(Debug)]
pub struct Records<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Records<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl<T> Iterator for Records<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Records<T> {}
