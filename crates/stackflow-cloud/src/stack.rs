//! Stack identity, status and snapshot types

use crate::error::StackError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state reported by the provisioning service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    DeleteComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    /// A state this client does not know about
    Other(String),
}

impl StackStatus {
    /// Every known state, in the order the list filter sends them
    pub const ALL: [StackStatus; 17] = [
        StackStatus::CreateInProgress,
        StackStatus::CreateFailed,
        StackStatus::CreateComplete,
        StackStatus::DeleteComplete,
        StackStatus::RollbackInProgress,
        StackStatus::RollbackFailed,
        StackStatus::RollbackComplete,
        StackStatus::DeleteInProgress,
        StackStatus::DeleteFailed,
        StackStatus::UpdateInProgress,
        StackStatus::UpdateCompleteCleanupInProgress,
        StackStatus::UpdateComplete,
        StackStatus::UpdateRollbackInProgress,
        StackStatus::UpdateRollbackFailed,
        StackStatus::UpdateRollbackCompleteCleanupInProgress,
        StackStatus::UpdateRollbackComplete,
        StackStatus::ReviewInProgress,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteFailed => "DELETE_FAILED",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            StackStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            StackStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            StackStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            StackStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            StackStatus::Other(s) => s,
        }
    }

    /// Parse a wire string, keeping unknown states as `Other`
    pub fn from_wire(s: &str) -> Self {
        StackStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .cloned()
            .unwrap_or_else(|| StackStatus::Other(s.to_string()))
    }

    /// No further transition happens without a new request
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateFailed
                | StackStatus::CreateComplete
                | StackStatus::DeleteComplete
                | StackStatus::RollbackFailed
                | StackStatus::RollbackComplete
                | StackStatus::DeleteFailed
                | StackStatus::UpdateComplete
                | StackStatus::UpdateRollbackFailed
                | StackStatus::UpdateRollbackComplete
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateFailed
                | StackStatus::RollbackFailed
                | StackStatus::RollbackComplete
                | StackStatus::DeleteFailed
                | StackStatus::UpdateRollbackFailed
        )
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackStatus {
    type Err = StackError;

    /// Strict parse for user input; only known states are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        match StackStatus::from_wire(&upper) {
            StackStatus::Other(_) => Err(StackError::InvalidStatus(s.to_string())),
            status => Ok(status),
        }
    }
}

impl Serialize for StackStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StackStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StackStatus::from_wire(&s))
    }
}

/// Name and status of a single stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub name: String,
    pub status: StackStatus,
}

impl StackSummary {
    pub fn new(name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Every stack the service reported for one list call, in service order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackSnapshot {
    stacks: Vec<StackSummary>,
}

impl StackSnapshot {
    pub fn new(stacks: Vec<StackSummary>) -> Self {
        Self { stacks }
    }

    /// First stack with the given name, in snapshot order
    pub fn find(&self, name: &str) -> Option<&StackSummary> {
        self.stacks.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// All entries with the given name (deleted stacks keep their name)
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StackSummary> {
        self.stacks.iter().filter(move |s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackSummary> {
        self.stacks.iter()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl FromIterator<StackSummary> for StackSnapshot {
    fn from_iter<T: IntoIterator<Item = StackSummary>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for StackSnapshot {
    type Item = StackSummary;
    type IntoIter = std::vec::IntoIter<StackSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.stacks.into_iter()
    }
}

/// States requested from the list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    statuses: Vec<StackStatus>,
}

impl StatusFilter {
    pub fn all() -> Self {
        Self {
            statuses: StackStatus::ALL.to_vec(),
        }
    }

    /// Only the given states; an empty set falls back to all states
    pub fn only(statuses: impl IntoIterator<Item = StackStatus>) -> Self {
        let mut selected: Vec<StackStatus> = Vec::new();
        for status in statuses {
            if !selected.contains(&status) {
                selected.push(status);
            }
        }
        if selected.is_empty() {
            Self::all()
        } else {
            Self { statuses: selected }
        }
    }

    pub fn statuses(&self) -> &[StackStatus] {
        &self.statuses
    }

    pub fn contains(&self, status: &StackStatus) -> bool {
        self.statuses.contains(status)
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// What the driver does in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    List,
    Delete,
    #[default]
    All,
}

impl Operation {
    /// Whether a template body is needed
    pub fn creates(&self) -> bool {
        matches!(self, Operation::Create | Operation::All)
    }

    pub fn deletes(&self) -> bool {
        matches!(self, Operation::Delete | Operation::All)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::List => write!(f, "list"),
            Operation::Delete => write!(f, "delete"),
            Operation::All => write!(f, "all"),
        }
    }
}

impl FromStr for Operation {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "list" => Ok(Operation::List),
            "delete" => Ok(Operation::Delete),
            "all" => Ok(Operation::All),
            other => Err(StackError::InvalidOperation(other.to_string())),
        }
    }
}
