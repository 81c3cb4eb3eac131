//! List the people who fixed bugs released in a milestone.
use log::*;
use std::collections::HashSet;

use crate::{
    Result,
    tracker::{request::SearchTasksRequest, types::BugTaskStatus},
    workflow::{WorkflowContext, require},
};

/// Unique display names of the assignees of Fix Released tasks in
/// `milestone`, in the order they were first seen.
pub async fn execute(
    ctx: &WorkflowContext,
    milestone: Option<String>,
) -> Result<Vec<String>> {
    let milestone = require(milestone, "--milestone")?;
    let milestone = ctx.group_milestone(&milestone).await?;

    let tasks = ctx
        .tracker()
        .search_tasks(
            &ctx.group().self_link,
            SearchTasksRequest {
                milestone_link: Some(milestone.self_link.clone()),
                statuses: vec![BugTaskStatus::FixReleased],
            },
        )
        .await?;

    let mut seen_links = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut contributors = vec![];

    for task in tasks.iter() {
        let Some(assignee_link) = &task.assignee_link else {
            debug!("bug #{} has no assignee", task.bug_id);
            continue;
        };

        if !seen_links.insert(assignee_link.clone()) {
            continue;
        }

        let person = ctx.tracker().get_person_by_link(assignee_link).await?;

        let name = person.preferred_name().to_string();
        if seen_names.insert(name.clone()) {
            contributors.push(name);
        }
    }

    Ok(contributors)
}
