//! Student record.

use super::{GroupId, StudentId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A student, optionally enrolled in one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Option<StudentId>,
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Back-reference to the owning group. `None` means unassigned.
    pub group_id: Option<GroupId>,
}

impl Student {
    /// Creates an unsaved, unassigned student.
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            date_of_birth,
            group_id: None,
        }
    }
}
