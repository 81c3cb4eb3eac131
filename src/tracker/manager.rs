//! Manager that wraps tracker implementations
use log::*;

use crate::{
    Result,
    tracker::{
        config::RemoteConfig,
        request::{
            CreateProjectRequest, ProjectRolesRequest, SearchTasksRequest,
            UpdateBugTaskRequest,
        },
        traits::Tracker,
        types::{
            BugTask, Milestone, Person, Project, ProjectGroup, Series,
            SourcePackage,
        },
    },
};

/// Front door to a [`Tracker`]. Reads pass straight through; every mutation
/// is logged and skipped when dry-run is enabled.
pub struct TrackerManager {
    tracker: Box<dyn Tracker>,
    remote_config: RemoteConfig,
}

impl TrackerManager {
    pub fn new(tracker: Box<dyn Tracker>) -> Self {
        let remote_config = tracker.remote_config();
        Self {
            tracker,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    pub fn dry_run(&self) -> bool {
        self.remote_config.dry_run
    }

    pub async fn get_project_group(&self, name: &str) -> Result<ProjectGroup> {
        debug!("resolving project group: {name}");
        self.tracker.get_project_group(name).await
    }

    pub async fn get_group_projects(
        &self,
        group: &ProjectGroup,
    ) -> Result<Vec<Project>> {
        self.tracker.get_group_projects(&group.self_link).await
    }

    pub async fn get_person(&self, name: &str) -> Result<Person> {
        debug!("resolving person: {name}");
        self.tracker.get_person(name).await
    }

    pub async fn get_person_by_link(&self, link: &str) -> Result<Person> {
        self.tracker.get_person_by_link(link).await
    }

    pub async fn get_project(&self, name: &str) -> Result<Option<Project>> {
        debug!("resolving project: {name}");
        self.tracker.get_project(name).await
    }

    pub async fn get_source_package(
        &self,
        distribution: &str,
        name: &str,
    ) -> Result<Option<SourcePackage>> {
        debug!("resolving source package {name} in {distribution}");
        self.tracker.get_source_package(distribution, name).await
    }

    pub async fn search_tasks(
        &self,
        target_link: &str,
        req: SearchTasksRequest,
    ) -> Result<Vec<BugTask>> {
        debug!("searching bug tasks on {target_link}: {:?}", req);
        let tasks = self.tracker.search_tasks(target_link, req).await?;
        debug!("found {} bug tasks", tasks.len());
        Ok(tasks)
    }

    pub async fn get_milestone(
        &self,
        target_link: &str,
        name: &str,
    ) -> Result<Option<Milestone>> {
        self.tracker.get_milestone(target_link, name).await
    }

    pub async fn get_series(
        &self,
        project_link: &str,
        name: &str,
    ) -> Result<Option<Series>> {
        self.tracker.get_series(project_link, name).await
    }

    pub async fn create_milestone(
        &self,
        series_link: &str,
        name: &str,
    ) -> Result<Milestone> {
        if self.dry_run() {
            warn!("dry_run: would create milestone {name} on {series_link}");
            return Ok(Milestone {
                name: name.into(),
                self_link: format!("{series_link}/+milestone/{name}"),
                date_targeted: None,
            });
        }
        self.tracker.create_milestone(series_link, name).await
    }

    pub async fn set_milestone_target_date(
        &self,
        milestone: &Milestone,
        date_targeted: Option<String>,
    ) -> Result<()> {
        if self.dry_run() {
            warn!(
                "dry_run: would set target date of milestone {} to {:?}",
                milestone.self_link, date_targeted
            );
            return Ok(());
        }
        self.tracker
            .set_milestone_target_date(&milestone.self_link, date_targeted)
            .await
    }

    pub async fn create_project(
        &self,
        req: CreateProjectRequest,
    ) -> Result<Project> {
        if self.dry_run() {
            warn!("dry_run: would create project: req: {:#?}", req);
            return Ok(Project {
                self_link: format!(
                    "{}{}",
                    self.remote_config.service_root, req.name
                ),
                web_link: String::new(),
                name: req.name,
                display_name: req.display_name,
            });
        }
        self.tracker.create_project(req).await
    }

    pub async fn set_project_roles(
        &self,
        req: ProjectRolesRequest,
    ) -> Result<()> {
        if self.dry_run() {
            warn!("dry_run: would set project roles: req: {:#?}", req);
            return Ok(());
        }
        self.tracker.set_project_roles(req).await
    }

    /// Every task of the bug that `task` belongs to.
    pub async fn get_bug_tasks(&self, task: &BugTask) -> Result<Vec<BugTask>> {
        self.tracker.get_bug_tasks(&task.bug_link).await
    }

    pub async fn add_bug_task(
        &self,
        task: &BugTask,
        target_link: &str,
    ) -> Result<BugTask> {
        if self.dry_run() {
            warn!(
                "dry_run: would add task for bug #{} on {target_link}",
                task.bug_id
            );
            return Ok(BugTask {
                self_link: String::new(),
                target_link: target_link.into(),
                milestone_link: None,
                ..task.clone()
            });
        }
        self.tracker.add_bug_task(&task.bug_link, target_link).await
    }

    pub async fn update_bug_task(
        &self,
        task: &BugTask,
        req: UpdateBugTaskRequest,
    ) -> Result<()> {
        if req.is_empty() {
            return Ok(());
        }
        if self.dry_run() {
            warn!(
                "dry_run: would update bug #{} ({}): req: {:?}",
                task.bug_id, task.target_name, req
            );
            return Ok(());
        }
        self.tracker.update_bug_task(&task.self_link, req).await
    }
}
