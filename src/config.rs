//! Configuration loading and parsing for `charm-bug-tool.toml` files.
//!
//! Every section is optional; missing fields fall back to the identifiers
//! used by the OpenStack charms team on Launchpad.
use log::*;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::{
    error::{BugToolError, Result},
    tracker::config::{
        DEFAULT_CONSUMER_KEY, DEFAULT_SERVICE_ROOT, DEFAULT_WEB_ROOT,
    },
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "charm-bug-tool.toml";
/// Project group whose bug tasks every bulk query is scoped to.
pub const DEFAULT_PROJECT_GROUP: &str = "openstack-charms";
/// Team set as bug supervisor and driver of migrated projects.
pub const DEFAULT_OWNERS_TEAM: &str = "openstack-charmers";
/// Distribution holding the legacy charm source packages.
pub const DEFAULT_LEGACY_DISTRIBUTION: &str = "charms";
/// Series new milestones are created under.
pub const DEFAULT_TRUNK_SERIES: &str = "trunk";
/// Prefix of destination project names for migrated charms.
pub const DEFAULT_PROJECT_PREFIX: &str = "charm-";
/// Base URL for migrated project home pages.
pub const DEFAULT_HOME_PAGE_BASE_URL: &str = "https://opendev.org/openstack";
/// Licence recorded on migrated projects.
pub const DEFAULT_LICENSE: &str = "Apache Licence";

/// Connection settings for the remote bug tracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Root of the tracker web service API.
    pub service_root: String,
    /// Root of the human facing web UI, used for permalinks.
    pub web_root: String,
    /// OAuth consumer key identifying this tool.
    pub consumer_key: String,
    /// Pre-issued OAuth access token. Falls back to LP_ACCESS_TOKEN.
    pub access_token: Option<String>,
    /// Pre-issued OAuth access secret. Falls back to LP_ACCESS_SECRET.
    pub access_secret: Option<String>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            service_root: DEFAULT_SERVICE_ROOT.into(),
            web_root: DEFAULT_WEB_ROOT.into(),
            consumer_key: DEFAULT_CONSUMER_KEY.into(),
            access_token: None,
            access_secret: None,
        }
    }
}

/// Identifiers of the charm projects on the tracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CharmsSettings {
    pub project_group: String,
    pub owners_team: String,
    pub legacy_distribution: String,
    pub trunk_series: String,
    pub project_prefix: String,
    pub home_page_base_url: String,
    pub license: String,
}

impl Default for CharmsSettings {
    fn default() -> Self {
        Self {
            project_group: DEFAULT_PROJECT_GROUP.into(),
            owners_team: DEFAULT_OWNERS_TEAM.into(),
            legacy_distribution: DEFAULT_LEGACY_DISTRIBUTION.into(),
            trunk_series: DEFAULT_TRUNK_SERIES.into(),
            project_prefix: DEFAULT_PROJECT_PREFIX.into(),
            home_page_base_url: DEFAULT_HOME_PAGE_BASE_URL.into(),
            license: DEFAULT_LICENSE.into(),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory searched for the `bugs.html` template. The built-in
    /// template is used when unset.
    pub template_dir: Option<String>,
}

/// Root configuration structure for `charm-bug-tool.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerSettings,
    pub charms: CharmsSettings,
    pub report: ReportSettings,
}

impl Config {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] in
    /// the working directory when it exists. An explicitly requested file
    /// that does not exist is an error.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_FILE, false),
        };

        if !Path::new(file).exists() {
            if required {
                return Err(BugToolError::operator(format!(
                    "config file not found: {file}"
                )));
            }
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        }

        info!("loading config from: {file}");
        let content = fs::read_to_string(file).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
