//! Student repository.
//!
//! # Responsibility
//! - Read and write student scalar fields.
//! - Route every grouped student through the group repository.
//!
//! # Invariants
//! - This repository only writes `students.group_id = NULL`; enrolling a
//!   student saves the whole target group, which re-attaches all of its
//!   students, not just this one.

use super::group_repo::GroupRepository;
use super::persist::{execute_by_id, upsert_student};
use super::queries;
use super::rows::read_student;
use super::{Records, RepoError, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::student::Student;
use crate::model::StudentId;
use log::debug;

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    /// Unassigned students followed by the students of every group.
    fn find_all(&self) -> RepoResult<Records<Student>>;
    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Saves the row directly when unassigned; otherwise saves the whole
    /// group named by `student.group_id` with this student enrolled.
    fn save(&self, student: Student) -> RepoResult<Student>;
    /// Deletes only the student row.
    fn remove_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
}

/// SQLite-backed student repository delegating link changes to `G`.
pub struct SqliteStudentRepository<'p, G> {
    provider: &'p ConnectionProvider,
    groups: &'p G,
}

impl<'p, G: GroupRepository> SqliteStudentRepository<'p, G> {
    pub fn new(provider: &'p ConnectionProvider, groups: &'p G) -> Self {
        Self { provider, groups }
    }

    fn load_row(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.provider.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(queries::SELECT_STUDENT_BY_ID.sql)?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Ok(Some(read_student(row)?)),
                None => Ok(None),
            }
        })
    }
}

impl<G: GroupRepository> StudentRepository for SqliteStudentRepository<'_, G> {
    fn find_all(&self) -> RepoResult<Records<Student>> {
        let mut students = self.provider.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(queries::SELECT_STUDENTS_WITHOUT_GROUP.sql)?;
            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(read_student(row)?);
            }
            Ok::<_, RepoError>(items)
        })?;

        students.extend(self.groups.find_all()?.flat_map(|group| group.students));
        Ok(Records::new(students))
    }

    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let Some(row) = self.load_row(id)? else {
            return Ok(None);
        };
        let Some(group_id) = row.group_id else {
            return Ok(Some(row));
        };

        let from_group = self
            .groups
            .find_by_id(group_id)?
            .and_then(|mut group| {
                let index = group.students.iter().position(|item| item.id == Some(id))?;
                Some(group.students.swap_remove(index))
            });
        Ok(Some(from_group.unwrap_or(row)))
    }

    fn save(&self, mut student: Student) -> RepoResult<Student> {
        let Some(group_id) = student.group_id else {
            self.provider.with_connection(|conn| upsert_student(conn, &mut student, None))?;
            debug!(
                "event=student_save module=repo status=ok path=direct student_id={}",
                student.id.unwrap_or_default()
            );
            return Ok(student);
        };

        let mut group = self.groups.find_by_id(group_id)?.ok_or_else(|| {
            RepoError::InvalidArgument(format!("student references unknown group {group_id}"))
        })?;
        let student_id = student.id;
        group.add_student(student);
        let mut saved = self.groups.save(group)?;

        debug!(
            "event=student_save module=repo status=ok path=group_cascade group_id={group_id} students={}",
            saved.students.len()
        );
        let index = match student_id {
            Some(id) => saved.students.iter().position(|item| item.id == Some(id)),
            None => saved.students.len().checked_sub(1),
        };
        index
            .map(|index| saved.students.swap_remove(index))
            .ok_or_else(|| {
                RepoError::InvalidData(format!("group {group_id} lost a student during save"))
            })
    }

    fn remove_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let Some(student) = self.find_by_id(id)? else {
            return Ok(None);
        };
        self.provider
            .with_connection(|conn| execute_by_id(conn, &queries::DELETE_STUDENT_BY_ID, id))?;
        debug!("event=student_remove module=repo status=ok student_id={id}");
        Ok(Some(student))
    }
}
