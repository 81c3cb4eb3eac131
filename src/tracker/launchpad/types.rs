use serde::{Deserialize, Serialize};

use crate::tracker::types::{
    BugTaskStatus, Milestone, Person, Project, ProjectGroup, Series,
    SourcePackage,
};

/// Paged collection returned by every collection resource and named
/// search operation.
#[derive(Debug, Deserialize)]
pub struct LaunchpadCollection<T> {
    pub entries: Vec<T>,
    pub next_collection_link: Option<String>,
    #[allow(unused)]
    pub total_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadProjectGroup {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
    pub projects_collection_link: String,
}

impl From<LaunchpadProjectGroup> for ProjectGroup {
    fn from(group: LaunchpadProjectGroup) -> Self {
        Self {
            name: group.name,
            display_name: group.display_name,
            self_link: group.self_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadProject {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
    #[serde(default)]
    pub web_link: String,
}

impl From<LaunchpadProject> for Project {
    fn from(project: LaunchpadProject) -> Self {
        Self {
            name: project.name,
            display_name: project.display_name,
            self_link: project.self_link,
            web_link: project.web_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadPerson {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
}

impl From<LaunchpadPerson> for Person {
    fn from(person: LaunchpadPerson) -> Self {
        Self {
            name: person.name,
            display_name: person.display_name,
            self_link: person.self_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadSeries {
    pub name: String,
    pub self_link: String,
}

impl From<LaunchpadSeries> for Series {
    fn from(series: LaunchpadSeries) -> Self {
        Self {
            name: series.name,
            self_link: series.self_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadMilestone {
    pub name: String,
    pub self_link: String,
    pub date_targeted: Option<String>,
}

impl From<LaunchpadMilestone> for Milestone {
    fn from(milestone: LaunchpadMilestone) -> Self {
        Self {
            name: milestone.name,
            self_link: milestone.self_link,
            date_targeted: milestone.date_targeted,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadSourcePackage {
    pub name: String,
    pub display_name: String,
    pub self_link: String,
}

impl From<LaunchpadSourcePackage> for SourcePackage {
    fn from(package: LaunchpadSourcePackage) -> Self {
        Self {
            name: package.name,
            display_name: package.display_name,
            self_link: package.self_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchpadBugTask {
    pub self_link: String,
    pub bug_link: String,
    /// Formatted as `Bug #<id> in <target>: "<title>"`
    pub title: String,
    pub status: BugTaskStatus,
    pub importance: String,
    pub assignee_link: Option<String>,
    pub milestone_link: Option<String>,
    pub target_link: String,
    pub bug_target_name: String,
    pub web_link: String,
}

#[derive(Debug, Default, Serialize)]
pub struct PatchMilestone {
    pub date_targeted: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct PatchProjectRoles {
    pub bug_supervisor_link: String,
    pub driver_link: String,
}
