//! SQLite data source bootstrap and connection acquisition.
//!
//! # Responsibility
//! - Validate data source settings and open SQLite connections.
//! - Bootstrap the records schema before any store touches the database.
//! - Hand out one scoped connection lease per logical store operation.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Every leased connection has `foreign_keys=ON`.
//! - A lease closes its connection on every exit path.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod provider;
pub mod schema;

pub use provider::{ConnectionLease, ConnectionProvider, DataSourceUrl};

pub type DbResult<T> = Result<T, DbError>;

/// Data-access failure raised while opening, bootstrapping or using SQLite.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedDriver(String),
    InvalidUrl(String),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedDriver(driver) => {
                write!(f, "unsupported data source driver `{driver}`; expected `sqlite`")
            }
            Self::InvalidUrl(url) => write!(f, "invalid data source url `{url}`"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedDriver(_) => None,
            Self::InvalidUrl(_) => None,
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
