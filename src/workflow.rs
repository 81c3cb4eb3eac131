//! Bulk bug-task workflows.
//!
//! Every workflow receives an explicit [`WorkflowContext`] and its user
//! parameters, validates the parameters it requires, and persists each
//! change immediately per bug task. Required parameters arrive as `Option`
//! so that a missing value surfaces as an operator error from the workflow
//! that needs it.
use derive_builder::Builder;
use log::*;
use std::{collections::HashMap, rc::Rc};

use crate::{
    BugToolError, Result,
    config::{CharmsSettings, Config},
    tracker::{
        manager::TrackerManager,
        types::{Milestone, Person, ProjectGroup},
    },
};

/// Find-and-list workflow for contributors of a milestone.
pub mod contributors;

/// Move bugs from the legacy distribution into per-charm projects.
pub mod migrate;

/// Bulk milestone maintenance: bump, clear, assign and create.
pub mod milestone;

/// Mark committed fixes released.
pub mod release;

/// Tabulate bug tasks across the project group.
pub mod search;

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct WorkflowParams {
    pub tracker: Rc<TrackerManager>,
    pub group: ProjectGroup,
    pub owners: Person,
    pub settings: CharmsSettings,
}

impl WorkflowParamsBuilder {
    pub fn build(&self) -> Result<WorkflowContext> {
        let params = self._build().map_err(|e| {
            BugToolError::invalid_config(format!(
                "Failed to build workflow context: {}",
                e
            ))
        })?;
        Ok(WorkflowContext::new(params))
    }
}

/// Handles every workflow operates on: the tracker, the project group that
/// scopes bulk queries and the team that owns the charm projects.
pub struct WorkflowContext {
    tracker: Rc<TrackerManager>,
    group: ProjectGroup,
    owners: Person,
    settings: CharmsSettings,
}

impl WorkflowContext {
    pub fn builder() -> WorkflowParamsBuilder {
        WorkflowParamsBuilder::default()
    }

    pub fn new(params: WorkflowParams) -> Self {
        Self {
            tracker: params.tracker,
            group: params.group,
            owners: params.owners,
            settings: params.settings,
        }
    }

    /// Resolve the configured project group and owners team.
    pub async fn connect(
        tracker: Rc<TrackerManager>,
        config: &Config,
    ) -> Result<Self> {
        let settings = config.charms.clone();
        let group = tracker.get_project_group(&settings.project_group).await?;
        let owners = tracker.get_person(&settings.owners_team).await?;

        info!(
            "working on project group {} with owners {}",
            group.name, owners.name
        );

        Self::builder()
            .tracker(tracker)
            .group(group)
            .owners(owners)
            .settings(settings)
            .build()
    }

    pub fn tracker(&self) -> &TrackerManager {
        &self.tracker
    }

    pub fn group(&self) -> &ProjectGroup {
        &self.group
    }

    pub fn owners(&self) -> &Person {
        &self.owners
    }

    pub fn settings(&self) -> &CharmsSettings {
        &self.settings
    }

    /// Resolve a milestone by name across the project group.
    pub async fn group_milestone(&self, name: &str) -> Result<Milestone> {
        self.tracker
            .get_milestone(&self.group.self_link, name)
            .await?
            .ok_or_else(|| {
                BugToolError::operator(format!(
                    "milestone {name} not found in {}",
                    self.group.name
                ))
            })
    }
}

/// Unwrap a required parameter or fail with an operator error naming the
/// command line option.
pub fn require(value: Option<String>, option: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BugToolError::operator(format!("{option} is required")))
}

/// Per-invocation cache of lookups of a single milestone name, keyed by
/// project link.
#[derive(Default)]
pub struct MilestoneCache {
    milestones: HashMap<String, Option<Milestone>>,
}

impl MilestoneCache {
    /// Look up `name` within the project at `project_link`.
    pub async fn get(
        &mut self,
        tracker: &TrackerManager,
        project_link: &str,
        name: &str,
    ) -> Result<Option<Milestone>> {
        if let Some(milestone) = self.milestones.get(project_link) {
            return Ok(milestone.clone());
        }

        let milestone = tracker.get_milestone(project_link, name).await?;
        self.milestones
            .insert(project_link.to_string(), milestone.clone());
        Ok(milestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn require_rejects_missing_and_blank_values() {
        let err = require(None, "--milestone").unwrap_err();
        assert!(err.is_operator());
        assert_eq!(err.to_string(), "--milestone is required");

        let err = require(Some("  ".into()), "--charm").unwrap_err();
        assert_eq!(err.to_string(), "--charm is required");

        assert_eq!(
            require(Some("24.04".into()), "--milestone").unwrap(),
            "24.04"
        );
    }

    #[tokio::test]
    async fn connect_resolves_group_and_owners() {
        let mut mock_tracker = mock_tracker();
        mock_tracker
            .expect_get_project_group()
            .withf(|name| name == "openstack-charms")
            .returning(|_| Ok(test_group()));
        mock_tracker
            .expect_get_person()
            .withf(|name| name == "openstack-charmers")
            .returning(|_| Ok(test_owners()));

        let tracker = Rc::new(TrackerManager::new(Box::new(mock_tracker)));
        let ctx = WorkflowContext::connect(tracker, &Config::default())
            .await
            .unwrap();

        assert_eq!(ctx.group().name, "openstack-charms");
        assert_eq!(ctx.owners().name, "openstack-charmers");
    }

    #[tokio::test]
    async fn group_milestone_fails_with_operator_error() {
        let mut mock_tracker = mock_tracker();
        mock_tracker.expect_get_milestone().returning(|_, _| Ok(None));

        let ctx = create_test_context(mock_tracker);
        let err = ctx.group_milestone("nope").await.unwrap_err();

        assert!(err.is_operator());
        assert_eq!(
            err.to_string(),
            "milestone nope not found in openstack-charms"
        );
    }

    #[tokio::test]
    async fn milestone_cache_looks_up_each_project_once() {
        let mut mock_tracker = mock_tracker();
        mock_tracker
            .expect_get_milestone()
            .times(2)
            .returning(|project, name| {
                Ok(Some(test_milestone(&format!("{project}/{name}"))))
            });

        let tracker = TrackerManager::new(Box::new(mock_tracker));
        let mut cache = MilestoneCache::default();

        let a = cache.get(&tracker, "p1", "24.04").await.unwrap();
        let again = cache.get(&tracker, "p1", "24.04").await.unwrap();
        let b = cache.get(&tracker, "p2", "24.04").await.unwrap();

        assert_eq!(a, again);
        assert_ne!(a, b);
    }
}
