//! Tabulate bug tasks across the project group.
use log::*;
use std::collections::HashMap;

use crate::{
    BugToolError, Result,
    report::{BugRow, UNASSIGNED},
    tracker::{
        request::SearchTasksRequest,
        types::{BugTask, BugTaskStatus},
    },
    workflow::WorkflowContext,
};

/// Filters accepted by the search command.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub milestone: Option<String>,
    pub status: Option<String>,
    /// Accepted for compatibility, does not narrow the search.
    pub target: Option<String>,
}

/// Fetch every group bug task matching the supplied filters and turn each
/// into a report row. Without filters every task of every status is
/// returned.
pub async fn execute(
    ctx: &WorkflowContext,
    params: SearchParams,
) -> Result<Vec<BugRow>> {
    let mut req = SearchTasksRequest::default();

    if let Some(milestone) = params.milestone.filter(|m| !m.trim().is_empty())
    {
        let milestone = ctx.group_milestone(milestone.trim()).await?;
        req.milestone_link = Some(milestone.self_link);
    }

    if let Some(status) = params.status.filter(|s| !s.trim().is_empty()) {
        let status: BugTaskStatus = status.parse()?;
        if !status.is_searchable() {
            return Err(BugToolError::operator(format!(
                "cannot search for status {status}"
            )));
        }
        req.statuses = vec![status];
    }

    if let Some(target) = params.target {
        debug!("ignoring --target {target}: search is always group wide");
    }

    let tasks = ctx
        .tracker()
        .search_tasks(&ctx.group().self_link, req)
        .await?;

    let mut owners: HashMap<String, String> = HashMap::new();
    let mut rows = Vec::with_capacity(tasks.len());

    for task in tasks.iter() {
        let owner = owner_name(ctx, &mut owners, task).await?;
        rows.push(BugRow {
            charm: task.target_name.clone(),
            status: task.status.to_string(),
            description: task.title.clone(),
            owner,
            priority: task.importance.clone(),
            link: task.web_link.clone(),
        });
    }

    Ok(rows)
}

async fn owner_name(
    ctx: &WorkflowContext,
    owners: &mut HashMap<String, String>,
    task: &BugTask,
) -> Result<String> {
    let Some(assignee_link) = &task.assignee_link else {
        return Ok(UNASSIGNED.to_string());
    };

    if let Some(name) = owners.get(assignee_link) {
        return Ok(name.clone());
    }

    let person = ctx.tracker().get_person_by_link(assignee_link).await?;
    let name = person.preferred_name().to_string();

    owners.insert(assignee_link.clone(), name.clone());
    Ok(name)
}
