//! Traits related to remote bug trackers
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    tracker::{
        config::RemoteConfig,
        request::{
            CreateProjectRequest, ProjectRolesRequest, SearchTasksRequest,
            UpdateBugTaskRequest,
        },
        types::{
            BugTask, Milestone, Person, Project, ProjectGroup, Series,
            SourcePackage,
        },
    },
};

/// Narrow interface to the hosted bug tracker. Objects are addressed by
/// their `self_link`; lookups that can miss return `Option`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Tracker: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;

    async fn get_project_group(&self, name: &str) -> Result<ProjectGroup>;
    async fn get_group_projects(&self, group_link: &str)
    -> Result<Vec<Project>>;
    async fn get_person(&self, name: &str) -> Result<Person>;
    async fn get_person_by_link(&self, link: &str) -> Result<Person>;
    async fn get_project(&self, name: &str) -> Result<Option<Project>>;
    async fn get_source_package(
        &self,
        distribution: &str,
        name: &str,
    ) -> Result<Option<SourcePackage>>;
    async fn search_tasks(
        &self,
        target_link: &str,
        req: SearchTasksRequest,
    ) -> Result<Vec<BugTask>>;
    async fn get_milestone(
        &self,
        target_link: &str,
        name: &str,
    ) -> Result<Option<Milestone>>;
    async fn get_series(
        &self,
        project_link: &str,
        name: &str,
    ) -> Result<Option<Series>>;
    async fn create_milestone(
        &self,
        series_link: &str,
        name: &str,
    ) -> Result<Milestone>;
    async fn set_milestone_target_date(
        &self,
        milestone_link: &str,
        date_targeted: Option<String>,
    ) -> Result<()>;
    async fn create_project(&self, req: CreateProjectRequest)
    -> Result<Project>;
    async fn set_project_roles(&self, req: ProjectRolesRequest) -> Result<()>;
    async fn get_bug_tasks(&self, bug_link: &str) -> Result<Vec<BugTask>>;
    async fn add_bug_task(
        &self,
        bug_link: &str,
        target_link: &str,
    ) -> Result<BugTask>;
    async fn update_bug_task(
        &self,
        task_link: &str,
        req: UpdateBugTaskRequest,
    ) -> Result<()>;
}
