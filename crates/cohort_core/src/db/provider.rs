//! Connection provider with scoped acquisition.
//!
//! # Responsibility
//! - Validate driver identity and data source URL at construction.
//! - Open one fresh SQLite connection per logical store operation.
//! - Close leased connections on every exit path.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and the configured busy timeout.
//! - The schema is bootstrapped before the first lease is handed out.
//! - In-memory data sources stay alive for the provider lifetime via an
//!   anchor connection that is never leased.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use crate::config::DataSourceConfig;
use log::{debug, error, info};
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;

const SQLITE_DRIVER: &str = "sqlite";
const SQLITE_SCHEME: &str = "sqlite:";
const MEMORY_TARGET: &str = ":memory:";

/// Parsed form of a `sqlite:` data source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceUrl {
    /// `sqlite:<path>` or `sqlite://<path>`.
    File(PathBuf),
    /// `sqlite::memory:`.
    Memory,
}

impl DataSourceUrl {
    pub fn parse(url: &str) -> DbResult<Self> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix(SQLITE_SCHEME)
            .ok_or_else(|| DbError::InvalidUrl(url.to_string()))?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);

        if rest == MEMORY_TARGET {
            return Ok(Self::Memory);
        }
        if rest.is_empty() || rest.contains('?') {
            return Err(DbError::InvalidUrl(url.to_string()));
        }
        Ok(Self::File(PathBuf::from(rest)))
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

enum Target {
    File(PathBuf),
    SharedMemory {
        uri: String,
        _anchor: Connection,
    },
}

/// Produces one new connection per logical operation.
pub struct ConnectionProvider {
    target: Target,
    busy_timeout: Duration,
    next_lease: AtomicU64,
}

impl ConnectionProvider {
    /// Validates `config` and bootstraps the schema on a first connection.
    ///
    /// # Errors
    /// - `UnsupportedDriver` when `config.driver` is not `sqlite`.
    /// - `InvalidUrl` when `config.url` is not a `sqlite:` URL.
    /// - `Sqlite`/`UnsupportedSchemaVersion` when bootstrap fails.
    pub fn new(config: &DataSourceConfig) -> DbResult<Self> {
        if !config.driver.trim().eq_ignore_ascii_case(SQLITE_DRIVER) {
            return Err(DbError::UnsupportedDriver(config.driver.clone()));
        }
        let url = DataSourceUrl::parse(&config.url)?;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);

        let started_at = Instant::now();
        let mode = url.mode();
        info!("event=db_open module=db status=start mode={mode}");

        match Self::bootstrap(url, busy_timeout) {
            Ok(target) => {
                info!(
                    "event=db_open module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    target,
                    busy_timeout,
                    next_lease: AtomicU64::new(1),
                })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Provider for a SQLite database file at `path`.
    pub fn open_file(path: impl AsRef<Path>) -> DbResult<Self> {
        let url = format!("{SQLITE_SCHEME}{}", path.as_ref().display());
        Self::new(&DataSourceConfig::sqlite(url))
    }

    /// Provider for a private in-memory database shared by its leases.
    pub fn in_memory() -> DbResult<Self> {
        Self::new(&DataSourceConfig::sqlite(format!("{SQLITE_SCHEME}{MEMORY_TARGET}")))
    }

    /// Opens a new connection wrapped in a lease that closes it on drop.
    pub fn acquire(&self) -> DbResult<ConnectionLease> {
        let lease_id = self.next_lease.fetch_add(1, Ordering::Relaxed);
        let conn = match &self.target {
            Target::File(path) => Connection::open(path),
            Target::SharedMemory { uri, .. } => Connection::open(uri),
        };

        let conn = match conn.map_err(DbError::from).and_then(|conn| {
            configure_connection(&conn, self.busy_timeout)?;
            Ok(conn)
        }) {
            Ok(conn) => conn,
            Err(err) => {
                error!("event=db_acquire module=db status=error lease={lease_id} error={err}");
                return Err(err);
            }
        };

        debug!("event=db_acquire module=db status=ok lease={lease_id}");
        Ok(ConnectionLease {
            conn,
            lease_id,
            acquired_at: Instant::now(),
        })
    }

    /// Runs `f` on a freshly leased connection; the lease is released when
    /// `f` returns, whether it succeeded or not.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut lease = self.acquire()?;
        f(&mut lease)
    }

    fn bootstrap(url: DataSourceUrl, busy_timeout: Duration) -> DbResult<Target> {
        match url {
            DataSourceUrl::File(path) => {
                let mut conn = Connection::open(&path)?;
                configure_connection(&conn, busy_timeout)?;
                ensure_schema(&mut conn)?;
                Ok(Target::File(path))
            }
            DataSourceUrl::Memory => {
                let uri = format!("file:cohort-{}?mode=memory&cache=shared", Uuid::new_v4());
                let mut anchor = Connection::open(&uri)?;
                configure_connection(&anchor, busy_timeout)?;
                ensure_schema(&mut anchor)?;
                Ok(Target::SharedMemory {
                    uri,
                    _anchor: anchor,
                })
            }
        }
    }
}

fn configure_connection(conn: &Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

/// A leased connection; closed when dropped.
pub struct ConnectionLease {
    conn: Connection,
    lease_id: u64,
    acquired_at: Instant,
}

impl ConnectionLease {
    pub fn id(&self) -> u64 {
        self.lease_id
    }
}

impl Deref for ConnectionLease {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for ConnectionLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        debug!(
            "event=db_release module=db status=ok lease={} held_ms={}",
            self.lease_id,
            self.acquired_at.elapsed().as_millis()
        );
    }
}
