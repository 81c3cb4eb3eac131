//! Common test helper functions shared across test modules.
//!
//! Fixtures mirror the shape of the Launchpad objects the workflows see, so
//! links are absolute and bug tasks point back at their project.
use std::rc::Rc;

use crate::{
    config::CharmsSettings,
    tracker::{
        config::RemoteConfig,
        manager::TrackerManager,
        traits::MockTracker,
        types::{
            BugTask, BugTaskStatus, Milestone, Person, Project, ProjectGroup,
        },
    },
    workflow::WorkflowContext,
};

pub const TEST_ROOT: &str = "https://api.launchpad.net/devel/";

pub fn link(path: &str) -> String {
    format!("{TEST_ROOT}{path}")
}

/// Creates a MockTracker that already answers `remote_config`, which the
/// [`TrackerManager`] reads on construction.
pub fn mock_tracker() -> MockTracker {
    let mut mock_tracker = MockTracker::new();
    mock_tracker
        .expect_remote_config()
        .returning(RemoteConfig::default);
    mock_tracker
}

pub fn test_group() -> ProjectGroup {
    ProjectGroup {
        name: "openstack-charms".into(),
        display_name: "OpenStack Charms".into(),
        self_link: link("openstack-charms"),
    }
}

pub fn test_owners() -> Person {
    Person {
        name: "openstack-charmers".into(),
        display_name: "OpenStack Charmers".into(),
        self_link: link("~openstack-charmers"),
    }
}

pub fn test_person(name: &str, display_name: &str) -> Person {
    Person {
        name: name.into(),
        display_name: display_name.into(),
        self_link: link(&format!("~{name}")),
    }
}

pub fn test_project(name: &str) -> Project {
    Project {
        name: name.into(),
        display_name: name.into(),
        self_link: link(name),
        web_link: format!("https://launchpad.net/{name}"),
    }
}

pub fn test_milestone(self_link: &str) -> Milestone {
    Milestone {
        name: self_link.rsplit('/').next().unwrap_or_default().into(),
        self_link: self_link.into(),
        date_targeted: None,
    }
}

/// Milestone `name` under `project`.
pub fn project_milestone(project: &str, name: &str) -> Milestone {
    test_milestone(&link(&format!("{project}/+milestone/{name}")))
}

/// Bug task for bug `id` targeting `project`.
pub fn test_task(id: u64, project: &str, status: BugTaskStatus) -> BugTask {
    BugTask {
        self_link: link(&format!("{project}/+bug/{id}")),
        bug_link: link(&format!("bugs/{id}")),
        bug_id: id,
        title: format!("bug {id}"),
        target_link: link(project),
        target_name: project.into(),
        status,
        importance: "Medium".into(),
        assignee_link: None,
        milestone_link: None,
        web_link: format!("https://bugs.launchpad.net/{project}/+bug/{id}"),
    }
}

/// Creates a WorkflowContext around the provided mock tracker. Set
/// expectations on the mock before calling this.
///
/// # Example
/// ```ignore
/// let mut mock_tracker = mock_tracker();
/// mock_tracker.expect_search_tasks().returning(|_, _| Ok(vec![]));
/// let ctx = create_test_context(mock_tracker);
/// ```
pub fn create_test_context(mock_tracker: MockTracker) -> WorkflowContext {
    create_test_context_with_settings(mock_tracker, CharmsSettings::default())
}

pub fn create_test_context_with_settings(
    mock_tracker: MockTracker,
    settings: CharmsSettings,
) -> WorkflowContext {
    WorkflowContext::builder()
        .tracker(Rc::new(TrackerManager::new(Box::new(mock_tracker))))
        .group(test_group())
        .owners(test_owners())
        .settings(settings)
        .build()
        .unwrap()
}

/// Adds an expectation resolving `name` on the group to a milestone.
pub fn expect_group_milestone(mock_tracker: &mut MockTracker, name: &str) {
    let wanted = name.to_string();
    let milestone = test_milestone(&link(&format!(
        "openstack-charms/+milestone/{name}"
    )));
    mock_tracker
        .expect_get_milestone()
        .withf(move |target, name| {
            target == link("openstack-charms") && name == wanted
        })
        .returning(move |_, _| Ok(Some(milestone.clone())));
}
