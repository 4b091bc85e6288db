//! Group record and its owned children.
//!
//! # Invariants
//! - `curator.group_id` and every `student.group_id` equal `self.id` once the
//!   group has been loaded or saved by the repository.
//! - `students` keeps caller order; the repository loads it by ascending id.

use super::curator::Curator;
use super::student::Student;
use super::{GroupId, StudentId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A study group with an optional curator and enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<GroupId>,
    /// Unique across all groups.
    pub name: String,
    pub graduation_date: NaiveDate,
    pub curator: Option<Curator>,
    pub students: Vec<Student>,
}

impl Group {
    /// Creates an unsaved group without curator or students.
    pub fn new(name: impl Into<String>, graduation_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            graduation_date,
            curator: None,
            students: Vec::new(),
        }
    }

    /// Replaces the curator and returns the previous one.
    ///
    /// The new curator's back-reference points at this group; the returned
    /// curator is detached in memory. Persisted on the next save.
    pub fn set_curator(&mut self, curator: Option<Curator>) -> Option<Curator> {
        let previous = std::mem::replace(&mut self.curator, curator);
        if let Some(curator) = self.curator.as_mut() {
            curator.group_id = self.id;
        }
        previous.map(|mut curator| {
            curator.group_id = None;
            curator
        })
    }

    /// Appends a student, or replaces the enrolled student with the same id.
    pub fn add_student(&mut self, mut student: Student) {
        student.group_id = self.id;
        let existing = student
            .id
            .and_then(|id| self.students.iter().position(|item| item.id == Some(id)));
        match existing {
            Some(index) => self.students[index] = student,
            None => self.students.push(student),
        }
    }

    /// Removes a student from the collection; detached in storage on the next save.
    pub fn remove_student(&mut self, id: StudentId) -> Option<Student> {
        let index = self.students.iter().position(|item| item.id == Some(id))?;
        let mut student = self.students.remove(index);
        student.group_id = None;
        Some(student)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|item| item.id == Some(id))
    }

    /// Returns whether every child points back at this group.
    pub fn is_consistent(&self) -> bool {
        let curator_ok = self
            .curator
            .as_ref()
            .map_or(true, |curator| curator.group_id == self.id);
        curator_ok && self.students.iter().all(|student| student.group_id == self.id)
    }

    /// Points every child's back-reference at this group.
    pub(crate) fn rewire(&mut self) {
        let id = self.id;
        if let Some(curator) = self.curator.as_mut() {
            curator.group_id = id;
        }
        for student in &mut self.students {
            student.group_id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Group;
    use crate::model::curator::Curator;
    use crate::model::student::Student;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn saved_group() -> Group {
        let mut group = Group::new("G1", date(2025, 6, 1));
        group.id = Some(7);
        group
    }

    #[test]
    fn set_curator_wires_new_and_detaches_previous() {
        let mut group = saved_group();
        let mut first = Curator::new("C1", "c1@x", 3);
        first.id = Some(1);
        assert!(group.set_curator(Some(first)).is_none());
        assert_eq!(group.curator.as_ref().unwrap().group_id, Some(7));

        let previous = group.set_curator(Some(Curator::new("C2", "c2@x", 1))).unwrap();
        assert_eq!(previous.id, Some(1));
        assert_eq!(previous.group_id, None);
        assert!(group.is_consistent());
    }

    #[test]
    fn add_student_replaces_same_id() {
        let mut group = saved_group();
        let mut student = Student::new("S1", date(2004, 1, 2));
        student.id = Some(11);
        group.add_student(student.clone());

        student.name = "S1 renamed".to_string();
        group.add_student(student);
        group.add_student(Student::new("S2", date(2004, 3, 4)));

        assert_eq!(group.students.len(), 2);
        assert_eq!(group.student(11).unwrap().name, "S1 renamed");
        assert!(group.is_consistent());
    }

    #[test]
    fn remove_student_detaches_in_memory() {
        let mut group = saved_group();
        let mut student = Student::new("S1", date(2004, 1, 2));
        student.id = Some(11);
        group.add_student(student);

        let removed = group.remove_student(11).unwrap();
        assert_eq!(removed.group_id, None);
        assert!(group.students.is_empty());
        assert!(group.remove_student(11).is_none());
    }

    #[test]
    fn rewire_follows_assigned_id() {
        let mut group = Group::new("G2", date(2026, 6, 1));
        group.set_curator(Some(Curator::new("C", "c@x", 0)));
        group.add_student(Student::new("S", date(2005, 5, 5)));
        assert!(group.is_consistent());

        group.id = Some(3);
        assert!(!group.is_consistent());
        group.rewire();
        assert!(group.is_consistent());
    }
}
