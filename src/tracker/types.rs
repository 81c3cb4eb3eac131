//! Normalized tracker objects shared by every tracker implementation.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::BugToolError;

/// Status of a bug task, named as the tracker names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugTaskStatus {
    New,
    Incomplete,
    Opinion,
    Invalid,
    #[serde(rename = "Won't Fix")]
    WontFix,
    Expired,
    Confirmed,
    Triaged,
    #[serde(rename = "In Progress")]
    InProgress,
    Deferred,
    #[serde(rename = "Fix Committed")]
    FixCommitted,
    #[serde(rename = "Fix Released")]
    FixReleased,
    #[serde(rename = "Does Not Exist")]
    DoesNotExist,
    Unknown,
}

impl BugTaskStatus {
    pub const ALL: [BugTaskStatus; 14] = [
        BugTaskStatus::New,
        BugTaskStatus::Incomplete,
        BugTaskStatus::Opinion,
        BugTaskStatus::Invalid,
        BugTaskStatus::WontFix,
        BugTaskStatus::Expired,
        BugTaskStatus::Confirmed,
        BugTaskStatus::Triaged,
        BugTaskStatus::InProgress,
        BugTaskStatus::Deferred,
        BugTaskStatus::FixCommitted,
        BugTaskStatus::FixReleased,
        BugTaskStatus::DoesNotExist,
        BugTaskStatus::Unknown,
    ];

    /// Statuses a task search accepts. `Unknown` is never a search filter.
    pub const SEARCHABLE: [BugTaskStatus; 13] = [
        BugTaskStatus::New,
        BugTaskStatus::Incomplete,
        BugTaskStatus::Opinion,
        BugTaskStatus::Invalid,
        BugTaskStatus::WontFix,
        BugTaskStatus::Expired,
        BugTaskStatus::Confirmed,
        BugTaskStatus::Triaged,
        BugTaskStatus::InProgress,
        BugTaskStatus::Deferred,
        BugTaskStatus::FixCommitted,
        BugTaskStatus::FixReleased,
        BugTaskStatus::DoesNotExist,
    ];

    /// Statuses the tracker considers open work.
    pub const UNRESOLVED: [BugTaskStatus; 6] = [
        BugTaskStatus::New,
        BugTaskStatus::Incomplete,
        BugTaskStatus::Confirmed,
        BugTaskStatus::Triaged,
        BugTaskStatus::InProgress,
        BugTaskStatus::FixCommitted,
    ];

    /// Statuses excluded from milestone bump and clear.
    pub const TERMINAL: [BugTaskStatus; 2] =
        [BugTaskStatus::FixCommitted, BugTaskStatus::FixReleased];

    pub fn as_str(&self) -> &'static str {
        match self {
            BugTaskStatus::New => "New",
            BugTaskStatus::Incomplete => "Incomplete",
            BugTaskStatus::Opinion => "Opinion",
            BugTaskStatus::Invalid => "Invalid",
            BugTaskStatus::WontFix => "Won't Fix",
            BugTaskStatus::Expired => "Expired",
            BugTaskStatus::Confirmed => "Confirmed",
            BugTaskStatus::Triaged => "Triaged",
            BugTaskStatus::InProgress => "In Progress",
            BugTaskStatus::Deferred => "Deferred",
            BugTaskStatus::FixCommitted => "Fix Committed",
            BugTaskStatus::FixReleased => "Fix Released",
            BugTaskStatus::DoesNotExist => "Does Not Exist",
            BugTaskStatus::Unknown => "Unknown",
        }
    }

    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }
}

impl fmt::Display for BugTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugTaskStatus {
    type Err = BugToolError;

    /// Matches case-insensitively so `fix released` and `Fix Released`
    /// are both accepted on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| {
                BugToolError::operator(format!("unknown bug status: {s}"))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectGroup {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
    pub web_link: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub name: String,
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Milestone {
    pub name: String,
    pub self_link: String,
    pub date_targeted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
}

impl Person {
    /// Display name, or the account name when no display name is set.
    pub fn preferred_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePackage {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
}

/// Per-project tracking record of a bug.
#[derive(Debug, Clone, PartialEq)]
pub struct BugTask {
    pub self_link: String,
    pub bug_link: String,
    pub bug_id: u64,
    pub title: String,
    pub target_link: String,
    pub target_name: String,
    pub status: BugTaskStatus,
    pub importance: String,
    pub assignee_link: Option<String>,
    pub milestone_link: Option<String>,
    pub web_link: String,
}

impl Default for BugTask {
    fn default() -> Self {
        Self {
            self_link: String::new(),
            bug_link: String::new(),
            bug_id: 0,
            title: String::new(),
            target_link: String::new(),
            target_name: String::new(),
            status: BugTaskStatus::New,
            importance: "Undecided".into(),
            assignee_link: None,
            milestone_link: None,
            web_link: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searchable_statuses_exclude_unknown() {
        assert!(!BugTaskStatus::Unknown.is_searchable());
        assert_eq!(
            BugTaskStatus::SEARCHABLE.len(),
            BugTaskStatus::ALL.len() - 1
        );
        assert!(BugTaskStatus::UNRESOLVED.iter().all(|s| s.is_searchable()));
    }

    #[test]
    fn parses_status_case_insensitively() {
        let status: BugTaskStatus = "fix committed".parse().unwrap();
        assert_eq!(status, BugTaskStatus::FixCommitted);

        let err = "Sort Of Fixed".parse::<BugTaskStatus>().unwrap_err();
        assert!(err.is_operator());
    }

    #[test]
    fn preferred_name_falls_back_to_account_name() {
        let person = Person {
            name: "alice".into(),
            display_name: "".into(),
            self_link: "~alice".into(),
        };
        assert_eq!(person.preferred_name(), "alice");

        let person = Person {
            display_name: "Alice Smith".into(),
            ..person
        };
        assert_eq!(person.preferred_name(), "Alice Smith");
    }
}
