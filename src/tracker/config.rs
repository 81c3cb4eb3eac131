//! Configuration for remote bug tracker connections.
use secrecy::SecretString;
use std::env;

use crate::config::TrackerSettings;

/// Launchpad web service root (devel API version).
pub const DEFAULT_SERVICE_ROOT: &str = "https://api.launchpad.net/devel/";
/// Launchpad bugs web UI root used for permalinks.
pub const DEFAULT_WEB_ROOT: &str = "https://bugs.launchpad.net/";
/// OAuth consumer key sent with authenticated requests.
pub const DEFAULT_CONSUMER_KEY: &str = "charm-bug-tool";
/// Environment variable holding a pre-issued access token.
pub const ACCESS_TOKEN_ENV: &str = "LP_ACCESS_TOKEN";
/// Environment variable holding a pre-issued access secret.
pub const ACCESS_SECRET_ENV: &str = "LP_ACCESS_SECRET";

/// Pre-issued OAuth credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub token: SecretString,
    pub secret: SecretString,
}

/// Remote tracker connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Root of the web service API, always ending in '/'.
    pub service_root: String,
    /// Root of the web UI.
    pub web_root: String,
    /// Credentials for authenticated requests. Anonymous when absent.
    pub credentials: Option<Credentials>,
    /// Log mutations instead of sending them.
    pub dry_run: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
            web_root: DEFAULT_WEB_ROOT.to_string(),
            credentials: None,
            dry_run: false,
        }
    }
}

impl RemoteConfig {
    /// Resolve connection settings, falling back to environment variables
    /// for credentials not present in the config file.
    pub fn from_settings(settings: &TrackerSettings, dry_run: bool) -> Self {
        let mut service_root = settings.service_root.clone();
        if !service_root.ends_with('/') {
            service_root.push('/');
        }

        let token = settings
            .access_token
            .clone()
            .or_else(|| env::var(ACCESS_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty());

        let secret = settings
            .access_secret
            .clone()
            .or_else(|| env::var(ACCESS_SECRET_ENV).ok())
            .unwrap_or_default();

        let credentials = token.map(|token| Credentials {
            consumer_key: settings.consumer_key.clone(),
            token: SecretString::from(token),
            secret: SecretString::from(secret),
        });

        Self {
            service_root,
            web_root: settings.web_root.clone(),
            credentials,
            dry_run,
        }
    }
}
