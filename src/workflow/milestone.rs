//! Bulk milestone maintenance across the project group.
use chrono::NaiveDate;
use log::*;

use crate::{
    BugToolError, Result,
    tracker::{
        request::{SearchTasksRequest, UpdateBugTaskRequest},
        types::{BugTask, BugTaskStatus, Milestone, Project},
    },
    workflow::{MilestoneCache, WorkflowContext, require},
};

/// Result of assigning a milestone to closed tasks.
#[derive(Debug, Default, PartialEq)]
pub struct AssignSummary {
    pub assigned: usize,
    /// Bug ids whose project has no milestone of that name.
    pub skipped: Vec<u64>,
}

/// Per-project result of ensuring a milestone exists.
#[derive(Debug, PartialEq)]
pub enum CreateOutcome {
    Created { project: String },
    Existing { project: String },
    NoSeries { project: String },
}

/// Open tasks (not Fix Committed or Fix Released) in a group milestone.
async fn open_tasks_in(
    ctx: &WorkflowContext,
    milestone: &Milestone,
) -> Result<Vec<BugTask>> {
    let tasks = ctx
        .tracker()
        .search_tasks(
            &ctx.group().self_link,
            SearchTasksRequest {
                milestone_link: Some(milestone.self_link.clone()),
                statuses: vec![],
            },
        )
        .await?;

    Ok(tasks.into_iter().filter(|t| !t.status.is_terminal()).collect())
}

/// Move every open task in `milestone` to `target_milestone` of the task's
/// own project. When a project has no such milestone the task's milestone is
/// cleared. Returns the number of tasks moved.
pub async fn bump(
    ctx: &WorkflowContext,
    milestone: Option<String>,
    target_milestone: Option<String>,
) -> Result<usize> {
    let milestone = require(milestone, "--milestone")?;
    let target_name = require(target_milestone, "--target-milestone")?;
    let milestone = ctx.group_milestone(&milestone).await?;

    let tasks = open_tasks_in(ctx, &milestone).await?;
    let mut cache = MilestoneCache::default();
    let mut moved = 0;

    for task in tasks.iter() {
        let target = cache
            .get(ctx.tracker(), &task.target_link, &target_name)
            .await?;

        match &target {
            Some(target) => info!(
                "moving bug #{} ({}) from {} to {}",
                task.bug_id, task.target_name, milestone.name, target.name
            ),
            None => warn!(
                "{} has no milestone {}, clearing milestone of bug #{}",
                task.target_name, target_name, task.bug_id
            ),
        }

        ctx.tracker()
            .update_bug_task(
                task,
                UpdateBugTaskRequest::milestone(target.map(|m| m.self_link)),
            )
            .await?;

        moved += 1;
    }

    Ok(moved)
}

/// Remove the milestone from every open task in `milestone`. Returns the
/// number of tasks cleared.
pub async fn clear(
    ctx: &WorkflowContext,
    milestone: Option<String>,
) -> Result<usize> {
    let milestone = require(milestone, "--milestone")?;
    let milestone = ctx.group_milestone(&milestone).await?;

    let tasks = open_tasks_in(ctx, &milestone).await?;

    for task in tasks.iter() {
        info!(
            "clearing milestone {} from bug #{} ({})",
            milestone.name, task.bug_id, task.target_name
        );

        ctx.tracker()
            .update_bug_task(task, UpdateBugTaskRequest::milestone(None))
            .await?;
    }

    Ok(tasks.len())
}

/// Give every closed task without a milestone the milestone `milestone` of
/// its own project. Tasks whose project lacks the milestone, or whose update
/// fails, are logged and skipped.
pub async fn assign(
    ctx: &WorkflowContext,
    milestone: Option<String>,
) -> Result<AssignSummary> {
    let name = require(milestone, "--milestone")?;

    let tasks = ctx
        .tracker()
        .search_tasks(
            &ctx.group().self_link,
            SearchTasksRequest {
                milestone_link: None,
                statuses: BugTaskStatus::TERMINAL.to_vec(),
            },
        )
        .await?;

    let mut cache = MilestoneCache::default();
    let mut summary = AssignSummary::default();

    for task in tasks.iter() {
        if !task.status.is_terminal() || task.milestone_link.is_some() {
            continue;
        }

        let lookup = cache.get(ctx.tracker(), &task.target_link, &name).await;
        let target = match lookup {
            Ok(Some(target)) => target,
            Ok(None) => {
                error!(
                    "milestone {} not found in {}, skipping bug #{}",
                    name, task.target_name, task.bug_id
                );
                summary.skipped.push(task.bug_id);
                continue;
            }
            Err(err) => {
                error!(
                    "failed to look up milestone {} in {}: {err}",
                    name, task.target_name
                );
                summary.skipped.push(task.bug_id);
                continue;
            }
        };

        info!(
            "assigning bug #{} ({}) to milestone {}",
            task.bug_id, task.target_name, target.name
        );

        if let Err(err) = ctx
            .tracker()
            .update_bug_task(
                task,
                UpdateBugTaskRequest::milestone(Some(target.self_link)),
            )
            .await
        {
            error!("failed to assign bug #{}: {err}", task.bug_id);
            summary.skipped.push(task.bug_id);
            continue;
        }

        summary.assigned += 1;
    }

    Ok(summary)
}

/// Validate an optional `YYYY-MM-DD` target date. Blank means no date.
fn parse_target_date(target_date: Option<String>) -> Result<Option<String>> {
    let Some(date) = target_date.map(|d| d.trim().to_string()) else {
        return Ok(None);
    };

    if date.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        BugToolError::operator(format!(
            "invalid --target-date {date}: expected YYYY-MM-DD"
        ))
    })?;

    Ok(Some(date))
}

/// Ensure milestone `milestone` exists on the trunk series of every project
/// in the group and set its target date.
pub async fn create(
    ctx: &WorkflowContext,
    milestone: Option<String>,
    target_date: Option<String>,
) -> Result<Vec<CreateOutcome>> {
    let name = require(milestone, "--milestone")?;
    let target_date = parse_target_date(target_date)?;

    let projects = ctx.tracker().get_group_projects(ctx.group()).await?;
    let mut outcomes = Vec::with_capacity(projects.len());

    for project in projects.iter() {
        outcomes.push(
            ensure_project_milestone(ctx, project, &name, target_date.clone())
                .await?,
        );
    }

    Ok(outcomes)
}

async fn ensure_project_milestone(
    ctx: &WorkflowContext,
    project: &Project,
    name: &str,
    target_date: Option<String>,
) -> Result<CreateOutcome> {
    let tracker = ctx.tracker();
    let series_name = &ctx.settings().trunk_series;

    let (milestone, outcome) =
        match tracker.get_milestone(&project.self_link, name).await? {
            Some(existing) => {
                info!("{}: using existing milestone {name}", project.name);
                (
                    existing,
                    CreateOutcome::Existing {
                        project: project.name.clone(),
                    },
                )
            }
            None => {
                let Some(series) =
                    tracker.get_series(&project.self_link, series_name).await?
                else {
                    error!(
                        "{}: no {series_name} series, skipping",
                        project.name
                    );
                    return Ok(CreateOutcome::NoSeries {
                        project: project.name.clone(),
                    });
                };

                info!(
                    "{}: creating milestone {name} on {series_name}",
                    project.name
                );
                (
                    tracker.create_milestone(&series.self_link, name).await?,
                    CreateOutcome::Created {
                        project: project.name.clone(),
                    },
                )
            }
        };

    info!(
        "{}: setting target date of {name} to {}",
        project.name,
        target_date.as_deref().unwrap_or("none")
    );
    tracker
        .set_milestone_target_date(&milestone, target_date)
        .await?;

    Ok(outcome)
}
