//! Implements the Tracker trait for Launchpad
use async_trait::async_trait;
use chrono::Utc;
use log::*;
use regex::Regex;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, LOCATION},
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

use crate::{
    Result,
    error::BugToolError,
    tracker::{
        config::{Credentials, RemoteConfig},
        launchpad::types::{
            LaunchpadBugTask, LaunchpadCollection, LaunchpadMilestone,
            LaunchpadPerson, LaunchpadProject, LaunchpadProjectGroup,
            LaunchpadSeries, LaunchpadSourcePackage, PatchMilestone,
            PatchProjectRoles,
        },
        request::{
            CreateProjectRequest, ProjectRolesRequest, SearchTasksRequest,
            UpdateBugTaskRequest,
        },
        traits::Tracker,
        types::{
            BugTask, BugTaskStatus, Milestone, Person, Project, ProjectGroup,
            Series, SourcePackage,
        },
    },
};

mod types;

const OAUTH_REALM: &str = "https://api.launchpad.net/";

static TASK_TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^Bug #(?<id>\d+) in (?<target>.+?): "(?<title>.*)"$"#)
        .unwrap()
});

/// Launchpad tracker implementation using reqwest against the REST web
/// service. Entries are addressed by absolute `self_link` URLs.
pub struct Launchpad {
    config: RemoteConfig,
    service_root: Url,
    client: Client,
}

impl Launchpad {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.append("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        let service_root = Url::parse(&config.service_root)?;

        Ok(Self {
            config,
            service_root,
            client,
        })
    }

    /// Attach an OAuth PLAINTEXT signature when credentials are configured.
    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config.credentials {
            Some(credentials) => {
                let header = oauth_header(credentials);
                let value = HeaderValue::from_str(&header)?;
                Ok(builder.header(AUTHORIZATION, value))
            }
            None => Ok(builder),
        }
    }

    fn entry_url(&self, path: &str) -> Result<Url> {
        Ok(self.service_root.join(path)?)
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>> {
        let request = self.authorize(self.client.get(url))?.build()?;
        let response = self.client.execute(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let result = response.error_for_status()?;
        let value: T = result.json().await?;
        Ok(Some(value))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = self.authorize(self.client.get(url))?.build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        Ok(result.json().await?)
    }

    /// Follow `next_collection_link` until the collection is exhausted.
    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>> {
        let mut entries = vec![];
        let mut next = Some(url);

        while let Some(url) = next {
            let page: LaunchpadCollection<T> = self.get(url).await?;
            entries.extend(page.entries);
            next = match page.next_collection_link {
                Some(link) => Some(Url::parse(&link)?),
                None => None,
            };
        }

        Ok(entries)
    }

    /// Invoke a write operation. Created entries are answered with
    /// `201 Created` and a Location header which is fetched; other
    /// operations answer with the entry in the body.
    async fn named_post<T: DeserializeOwned>(
        &self,
        link: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = Url::parse(link)?;
        let request = self
            .authorize(self.client.post(url).form(params))?
            .build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;

        if let Some(location) = created_location(&result)? {
            return self.get(location).await;
        }

        Ok(result.json().await?)
    }

    async fn patch(&self, link: &str, body: Value) -> Result<()> {
        let url = Url::parse(link)?;
        let request = self
            .authorize(self.client.patch(url).json(&body))?
            .build()?;
        let response = self.client.execute(request).await?;
        response.error_for_status()?;
        Ok(())
    }
}

fn created_location(response: &Response) -> Result<Option<Url>> {
    if response.status() != StatusCode::CREATED {
        return Ok(None);
    }
    match response.headers().get(LOCATION) {
        Some(value) => {
            let location = value.to_str().map_err(|e| {
                BugToolError::tracker(format!("invalid Location header: {e}"))
            })?;
            Ok(Some(Url::parse(location)?))
        }
        None => Ok(None),
    }
}

fn percent_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn oauth_header(credentials: &Credentials) -> String {
    let now = Utc::now();
    let nonce = now.timestamp_nanos_opt().unwrap_or_default();
    let params = [
        ("oauth_consumer_key", percent_encode(&credentials.consumer_key)),
        ("oauth_token", percent_encode(credentials.token.expose_secret())),
        ("oauth_signature_method", "PLAINTEXT".to_string()),
        (
            "oauth_signature",
            format!("&{}", percent_encode(credentials.secret.expose_secret())),
        ),
        ("oauth_timestamp", now.timestamp().to_string()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_version", "1.0".to_string()),
    ];

    let fields = params
        .iter()
        .map(|(key, value)| format!(r#"{key}="{value}""#))
        .collect::<Vec<String>>()
        .join(", ");

    format!(r#"OAuth realm="{OAUTH_REALM}", {fields}"#)
}

/// Split the task title into bug id and bug title, falling back to the
/// trailing segment of the bug link.
fn parse_task(task: LaunchpadBugTask) -> BugTask {
    let (bug_id, title) = match TASK_TITLE_REGEX.captures(&task.title) {
        Some(caps) => (
            caps["id"].parse().unwrap_or_default(),
            caps["title"].to_string(),
        ),
        None => (
            task.bug_link
                .rsplit('/')
                .next()
                .and_then(|id| id.parse().ok())
                .unwrap_or_default(),
            task.title.clone(),
        ),
    };

    BugTask {
        self_link: task.self_link,
        bug_link: task.bug_link,
        bug_id,
        title,
        target_link: task.target_link,
        target_name: task.bug_target_name,
        status: task.status,
        importance: task.importance,
        assignee_link: task.assignee_link,
        milestone_link: task.milestone_link,
        web_link: task.web_link,
    }
}

#[async_trait]
impl Tracker for Launchpad {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_project_group(&self, name: &str) -> Result<ProjectGroup> {
        let url = self.entry_url(name)?;
        let group: Option<LaunchpadProjectGroup> =
            self.get_optional(url).await?;
        group.map(ProjectGroup::from).ok_or_else(|| {
            BugToolError::operator(format!("project group not found: {name}"))
        })
    }

    async fn get_group_projects(
        &self,
        group_link: &str,
    ) -> Result<Vec<Project>> {
        let group: LaunchpadProjectGroup =
            self.get(Url::parse(group_link)?).await?;
        let projects: Vec<LaunchpadProject> = self
            .get_collection(Url::parse(&group.projects_collection_link)?)
            .await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn get_person(&self, name: &str) -> Result<Person> {
        let url = self.entry_url(&format!("~{name}"))?;
        let person: Option<LaunchpadPerson> = self.get_optional(url).await?;
        person.map(Person::from).ok_or_else(|| {
            BugToolError::operator(format!("person or team not found: {name}"))
        })
    }

    async fn get_person_by_link(&self, link: &str) -> Result<Person> {
        let person: LaunchpadPerson = self.get(Url::parse(link)?).await?;
        Ok(person.into())
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>> {
        let url = self.entry_url(name)?;
        let project: Option<LaunchpadProject> = self.get_optional(url).await?;
        Ok(project.map(Project::from))
    }

    async fn get_source_package(
        &self,
        distribution: &str,
        name: &str,
    ) -> Result<Option<SourcePackage>> {
        let url = self.entry_url(&format!("{distribution}/+source/{name}"))?;
        let package: Option<LaunchpadSourcePackage> =
            self.get_optional(url).await?;
        Ok(package.map(SourcePackage::from))
    }

    async fn search_tasks(
        &self,
        target_link: &str,
        req: SearchTasksRequest,
    ) -> Result<Vec<BugTask>> {
        let mut url = Url::parse(target_link)?;

        let statuses = if req.statuses.is_empty() {
            BugTaskStatus::SEARCHABLE.to_vec()
        } else {
            req.statuses
        };

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ws.op", "searchTasks");
            if let Some(milestone) = &req.milestone_link {
                query.append_pair("milestone", milestone);
            }
            for status in statuses.iter() {
                query.append_pair("status", status.as_str());
            }
        }

        let tasks: Vec<LaunchpadBugTask> = self.get_collection(url).await?;
        Ok(tasks.into_iter().map(parse_task).collect())
    }

    async fn get_milestone(
        &self,
        target_link: &str,
        name: &str,
    ) -> Result<Option<Milestone>> {
        let mut url = Url::parse(target_link)?;
        url.query_pairs_mut()
            .append_pair("ws.op", "getMilestone")
            .append_pair("name", name);
        let milestone: Option<LaunchpadMilestone> = self.get(url).await?;
        Ok(milestone.map(Milestone::from))
    }

    async fn get_series(
        &self,
        project_link: &str,
        name: &str,
    ) -> Result<Option<Series>> {
        let mut url = Url::parse(project_link)?;
        url.query_pairs_mut()
            .append_pair("ws.op", "getSeries")
            .append_pair("name", name);
        let series: Option<LaunchpadSeries> = self.get(url).await?;
        Ok(series.map(Series::from))
    }

    async fn create_milestone(
        &self,
        series_link: &str,
        name: &str,
    ) -> Result<Milestone> {
        info!("creating milestone {name} on {series_link}");
        let milestone: LaunchpadMilestone = self
            .named_post(
                series_link,
                &[("ws.op", "newMilestone"), ("name", name)],
            )
            .await?;
        Ok(milestone.into())
    }

    async fn set_milestone_target_date(
        &self,
        milestone_link: &str,
        date_targeted: Option<String>,
    ) -> Result<()> {
        let body = serde_json::to_value(PatchMilestone { date_targeted })?;
        self.patch(milestone_link, body).await
    }

    async fn create_project(
        &self,
        req: CreateProjectRequest,
    ) -> Result<Project> {
        let projects_link = self.entry_url("projects")?;

        let mut params = vec![
            ("ws.op", "new_project"),
            ("name", req.name.as_str()),
            ("display_name", req.display_name.as_str()),
            ("title", req.title.as_str()),
            ("summary", req.summary.as_str()),
            ("home_page_url", req.home_page_url.as_str()),
        ];
        for license in req.licenses.iter() {
            params.push(("licenses", license.as_str()));
        }

        let project: LaunchpadProject =
            self.named_post(projects_link.as_str(), &params).await?;
        Ok(project.into())
    }

    async fn set_project_roles(&self, req: ProjectRolesRequest) -> Result<()> {
        let body = serde_json::to_value(PatchProjectRoles {
            bug_supervisor_link: req.bug_supervisor_link,
            driver_link: req.driver_link,
        })?;
        self.patch(&req.project_link, body).await
    }

    async fn get_bug_tasks(&self, bug_link: &str) -> Result<Vec<BugTask>> {
        let url = Url::parse(&format!("{bug_link}/bug_tasks"))?;
        let tasks: Vec<LaunchpadBugTask> = self.get_collection(url).await?;
        Ok(tasks.into_iter().map(parse_task).collect())
    }

    async fn add_bug_task(
        &self,
        bug_link: &str,
        target_link: &str,
    ) -> Result<BugTask> {
        let task: LaunchpadBugTask = self
            .named_post(
                bug_link,
                &[("ws.op", "addTask"), ("target", target_link)],
            )
            .await?;
        Ok(parse_task(task))
    }

    async fn update_bug_task(
        &self,
        task_link: &str,
        req: UpdateBugTaskRequest,
    ) -> Result<()> {
        let mut body = Map::new();
        if let Some(status) = req.status {
            body.insert("status".into(), json!(status));
        }
        if let Some(importance) = req.importance {
            body.insert("importance".into(), json!(importance));
        }
        if let Some(assignee) = req.assignee_link {
            body.insert("assignee_link".into(), json!(assignee));
        }
        if let Some(milestone) = req.milestone_link {
            body.insert("milestone_link".into(), json!(milestone));
        }
        debug!("patching {task_link}: {:?}", body);
        self.patch(task_link, Value::Object(body)).await
    }
}
