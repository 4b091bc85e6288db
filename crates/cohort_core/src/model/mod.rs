//! Records entity model.
//!
//! # Responsibility
//! - Define the three persisted records: `Group`, `Curator` and `Student`.
//! - Keep relationships expressed as integer ids, never object pointers.
//!
//! # Invariants
//! - An entity id is `None` until the first insert and immutable afterwards.
//! - A `Group` owns its curator and students; children only carry the owning
//!   group id as a back-reference, re-wired on every read and save.

pub mod curator;
pub mod group;
pub mod student;

/// Store-assigned identity of a group row.
pub type GroupId = i64;
/// Store-assigned identity of a curator row.
pub type CuratorId = i64;
/// Store-assigned identity of a student row.
pub type StudentId = i64;
