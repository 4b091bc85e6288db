//! Cascading relational persistence for study groups, curators and students.
//! The group repository owns every group/child link; the curator and student
//! repositories route linked writes through it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{AppConfig, ConfigError, DataSourceConfig};
pub use db::{ConnectionLease, ConnectionProvider, DataSourceUrl, DbError, DbResult};
pub use logging::{default_log_level, init_logging, LoggingConfig};
pub use model::curator::Curator;
pub use model::group::Group;
pub use model::student::Student;
pub use model::{CuratorId, GroupId, StudentId};
pub use repo::curator_repo::{CuratorRepository, SqliteCuratorRepository};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{Records, RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
