//! Curator record.

use super::{CuratorId, GroupId};
use serde::{Deserialize, Serialize};

/// A curator, optionally assigned to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curator {
    pub id: Option<CuratorId>,
    pub name: String,
    pub email: String,
    /// Whole years of experience.
    pub experience: u32,
    /// Back-reference to the owning group. `None` means unassigned.
    pub group_id: Option<GroupId>,
}

impl Curator {
    /// Creates an unsaved, unassigned curator.
    pub fn new(name: impl Into<String>, email: impl Into<String>, experience: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            experience,
            group_id: None,
        }
    }
}
