//! Move bugs from a legacy distribution source package into a per-charm
//! project.
use log::*;

use crate::{
    Result,
    tracker::{
        request::{
            CreateProjectRequest, ProjectRolesRequest, SearchTasksRequest,
            UpdateBugTaskRequest,
        },
        types::{BugTask, BugTaskStatus, Project},
    },
    workflow::{WorkflowContext, require},
};

/// What happened to a single legacy bug task.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    Migrated { bug_id: u64, new_task_link: String },
    Failed { bug_id: u64, reason: String },
}

/// Summary of a charm migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub project: String,
    pub created_project: bool,
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationReport {
    pub fn migrated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MigrationOutcome::Migrated { .. }))
            .count()
    }

    pub fn failed(&self) -> Vec<&MigrationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MigrationOutcome::Failed { .. }))
            .collect()
    }
}

/// Migrate the unresolved bugs of `charm` from the legacy distribution into
/// its own project, creating the project on first use. Returns `None` when
/// the legacy distribution has no source package for the charm.
pub async fn execute(
    ctx: &WorkflowContext,
    charm: Option<String>,
) -> Result<Option<MigrationReport>> {
    let charm = require(charm, "--charm")?;
    let settings = ctx.settings();

    let Some(package) = ctx
        .tracker()
        .get_source_package(&settings.legacy_distribution, &charm)
        .await?
    else {
        warn!(
            "no source package {charm} in {}, nothing to migrate",
            settings.legacy_distribution
        );
        return Ok(None);
    };

    let (project, created_project) = ensure_project(ctx, &charm).await?;

    let tasks = ctx
        .tracker()
        .search_tasks(
            &package.self_link,
            SearchTasksRequest {
                milestone_link: None,
                statuses: BugTaskStatus::UNRESOLVED.to_vec(),
            },
        )
        .await?;

    info!(
        "migrating {} bug tasks from {} to {}",
        tasks.len(),
        package.display_name,
        project.name
    );

    let mut outcomes = Vec::with_capacity(tasks.len());

    for task in tasks.iter() {
        outcomes.push(migrate_task(ctx, task, &project).await);
    }

    Ok(Some(MigrationReport {
        project: project.name,
        created_project,
        outcomes,
    }))
}

async fn ensure_project(
    ctx: &WorkflowContext,
    charm: &str,
) -> Result<(Project, bool)> {
    let settings = ctx.settings();
    let name = format!("{}{charm}", settings.project_prefix);

    if let Some(project) = ctx.tracker().get_project(&name).await? {
        debug!("project {name} already exists");
        return Ok((project, false));
    }

    let display_name = format!("OpenStack {charm} charm");
    info!("creating project {name}: {display_name}");

    let project = ctx
        .tracker()
        .create_project(CreateProjectRequest {
            name: name.clone(),
            display_name: display_name.clone(),
            title: display_name,
            summary: format!(
                "Juju charm for deploying and operating OpenStack {charm}."
            ),
            home_page_url: format!(
                "{}/{name}",
                settings.home_page_base_url.trim_end_matches('/')
            ),
            licenses: vec![settings.license.clone()],
        })
        .await?;

    let owners = ctx.owners();
    info!("setting {} as bug supervisor and driver of {name}", owners.name);

    ctx.tracker()
        .set_project_roles(ProjectRolesRequest {
            project_link: project.self_link.clone(),
            bug_supervisor_link: owners.self_link.clone(),
            driver_link: owners.self_link.clone(),
        })
        .await?;

    Ok((project, true))
}

async fn migrate_task(
    ctx: &WorkflowContext,
    task: &BugTask,
    project: &Project,
) -> MigrationOutcome {
    match copy_task(ctx, task, project).await {
        Ok(new_task_link) => {
            if let Err(err) = ctx
                .tracker()
                .update_bug_task(
                    task,
                    UpdateBugTaskRequest::status(BugTaskStatus::Invalid),
                )
                .await
            {
                error!(
                    "bug #{} copied to {} but not marked invalid: {err}",
                    task.bug_id, project.name
                );
                return MigrationOutcome::Failed {
                    bug_id: task.bug_id,
                    reason: format!(
                        "copied but failed to mark original invalid: {err}"
                    ),
                };
            }

            info!("migrated bug #{} to {}", task.bug_id, project.name);
            MigrationOutcome::Migrated {
                bug_id: task.bug_id,
                new_task_link,
            }
        }
        Err(err) => {
            error!(
                "failed to migrate bug #{} to {}: {err}",
                task.bug_id, project.name
            );
            MigrationOutcome::Failed {
                bug_id: task.bug_id,
                reason: err.to_string(),
            }
        }
    }
}

/// Ensure the bug has a task on `project` carrying over status, importance
/// and assignee. A task left behind by an earlier interrupted run is reused.
/// Returns the link of the destination task.
async fn copy_task(
    ctx: &WorkflowContext,
    task: &BugTask,
    project: &Project,
) -> Result<String> {
    let existing = ctx
        .tracker()
        .get_bug_tasks(task)
        .await?
        .into_iter()
        .find(|t| t.target_link == project.self_link);

    let new_task = match existing {
        Some(existing) => {
            info!(
                "bug #{} already affects {}, reusing its task",
                task.bug_id, project.name
            );
            existing
        }
        None => {
            ctx.tracker()
                .add_bug_task(task, &project.self_link)
                .await?
        }
    };

    ctx.tracker()
        .update_bug_task(
            &new_task,
            UpdateBugTaskRequest {
                status: Some(task.status),
                importance: Some(task.importance.clone()),
                assignee_link: task.assignee_link.clone().map(Some),
                milestone_link: None,
            },
        )
        .await?;

    Ok(new_task.self_link)
}
