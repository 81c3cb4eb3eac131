//! Mark committed fixes in a milestone as released.
use log::*;

use crate::{
    Result,
    tracker::{
        request::{SearchTasksRequest, UpdateBugTaskRequest},
        types::BugTaskStatus,
    },
    workflow::{WorkflowContext, require},
};

/// Move every Fix Committed task in `milestone` to Fix Released and return
/// how many tasks were updated.
pub async fn execute(
    ctx: &WorkflowContext,
    milestone: Option<String>,
) -> Result<usize> {
    let milestone = require(milestone, "--milestone")?;
    let milestone = ctx.group_milestone(&milestone).await?;

    let tasks = ctx
        .tracker()
        .search_tasks(
            &ctx.group().self_link,
            SearchTasksRequest {
                milestone_link: Some(milestone.self_link.clone()),
                statuses: vec![BugTaskStatus::FixCommitted],
            },
        )
        .await?;

    let mut released = 0;

    for task in tasks.iter() {
        // searchTasks filters server side, re-check before writing
        if task.status != BugTaskStatus::FixCommitted {
            continue;
        }

        info!(
            "releasing bug #{} ({}): {}",
            task.bug_id, task.target_name, task.title
        );

        ctx.tracker()
            .update_bug_task(
                task,
                UpdateBugTaskRequest::status(BugTaskStatus::FixReleased),
            )
            .await?;

        released += 1;
    }

    info!("released {released} bug tasks in milestone {}", milestone.name);

    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::BugToolError, test_helpers::*};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn releases_only_fix_committed_tasks() {
        let mut mock_tracker = mock_tracker();
        expect_group_milestone(&mut mock_tracker, "2024.1");

        mock_tracker
            .expect_search_tasks()
            .withf(|target, req| {
                target == link("openstack-charms")
                    && req.statuses == vec![BugTaskStatus::FixCommitted]
                    && req.milestone_link
                        == Some(link("openstack-charms/+milestone/2024.1"))
            })
            .returning(|_, _| {
                Ok(vec![
                    test_task(1, "charm-nova", BugTaskStatus::FixCommitted),
                    test_task(2, "charm-nova", BugTaskStatus::FixCommitted),
                    test_task(3, "charm-keystone", BugTaskStatus::New),
                ])
            });

        let updated = Arc::new(Mutex::new(vec![]));
        let recorded = Arc::clone(&updated);
        mock_tracker.expect_update_bug_task().returning(move |task_link, req| {
            assert_eq!(req.status, Some(BugTaskStatus::FixReleased));
            recorded.lock().unwrap().push(task_link.to_string());
            Ok(())
        });

        let ctx = create_test_context(mock_tracker);
        let released = execute(&ctx, Some("2024.1".into())).await.unwrap();

        assert_eq!(released, 2);
        assert_eq!(
            *updated.lock().unwrap(),
            vec![link("charm-nova/+bug/1"), link("charm-nova/+bug/2")]
        );
    }

    #[tokio::test]
    async fn fails_without_milestone() {
        let ctx = create_test_context(mock_tracker());
        let result = execute(&ctx, None).await;
        assert!(matches!(result, Err(BugToolError::Operator(_))));
    }

    #[tokio::test]
    async fn fails_for_unknown_milestone() {
        let mut mock_tracker = mock_tracker();
        mock_tracker.expect_get_milestone().returning(|_, _| Ok(None));
        mock_tracker.expect_search_tasks().never();

        let ctx = create_test_context(mock_tracker);
        let result = execute(&ctx, Some("9999.9".into())).await;

        assert!(matches!(result, Err(BugToolError::Operator(_))));
    }

    #[tokio::test]
    async fn propagates_tracker_errors() {
        let mut mock_tracker = mock_tracker();
        expect_group_milestone(&mut mock_tracker, "2024.1");
        mock_tracker.expect_search_tasks().returning(|_, _| {
            Ok(vec![
                test_task(1, "charm-nova", BugTaskStatus::FixCommitted),
                test_task(2, "charm-nova", BugTaskStatus::FixCommitted),
            ])
        });
        mock_tracker
            .expect_update_bug_task()
            .times(1)
            .returning(|_, _| Err(BugToolError::tracker("permission denied")));

        let ctx = create_test_context(mock_tracker);
        let result = execute(&ctx, Some("2024.1".into())).await;

        assert!(matches!(result, Err(BugToolError::Tracker(_))));
    }
}
