use crate::tracker::types::BugTaskStatus;

#[derive(Debug, Clone, Default, PartialEq)]
/// Filters applied to a bug task search. Empty statuses means every status.
pub struct SearchTasksRequest {
    pub milestone_link: Option<String>,
    pub statuses: Vec<BugTaskStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Fields to write on a bug task. `None` leaves a field untouched; the inner
/// `None` of `assignee_link` and `milestone_link` clears it.
pub struct UpdateBugTaskRequest {
    pub status: Option<BugTaskStatus>,
    pub importance: Option<String>,
    pub assignee_link: Option<Option<String>>,
    pub milestone_link: Option<Option<String>>,
}

impl UpdateBugTaskRequest {
    pub fn status(status: BugTaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn milestone(milestone_link: Option<String>) -> Self {
        Self {
            milestone_link: Some(milestone_link),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.importance.is_none()
            && self.assignee_link.is_none()
            && self.milestone_link.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Request to register a new project.
pub struct CreateProjectRequest {
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub summary: String,
    pub home_page_url: String,
    pub licenses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Request to make a team responsible for a project's bugs.
pub struct ProjectRolesRequest {
    pub project_link: String,
    pub bug_supervisor_link: String,
    pub driver_link: String,
}
