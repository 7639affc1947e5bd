use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/";
pub const DEFAULT_RESOURCE_PATH: &str = "api/tasks";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for talking to the remote store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend, e.g. `http://localhost:8000/`.
    pub endpoint: String,
    /// Path of the task resource below the endpoint.
    pub resource_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where TUI sessions write their log.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// - `EMPTASKS_API_ENDPOINT`: backend base URL.
    /// - `EMPTASKS_RESOURCE_PATH`: task resource path (`api/tasks`).
    /// - `EMPTASKS_TIMEOUT_SECS`: request timeout in seconds.
    /// - `EMPTASKS_LOG_FILE`: log file used by the TUI.
    ///
    /// Unset variables fall back to the defaults. `endpoint` (from the command
    /// line) wins over `EMPTASKS_API_ENDPOINT`; the result is validated once,
    /// after it has been applied.
    pub fn load(endpoint: Option<String>) -> Result<Config, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok(), endpoint)
    }

    /// [`load`](Self::load) with variables looked up through `var`.
    pub fn from_vars<F>(var: F, endpoint: Option<String>) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(endpoint) = endpoint.or_else(|| var("EMPTASKS_API_ENDPOINT")) {
            config.endpoint = endpoint;
        }
        if let Some(path) = var("EMPTASKS_RESOURCE_PATH") {
            config.resource_path = path;
        }
        if let Some(secs) = var("EMPTASKS_TIMEOUT_SECS") {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "EMPTASKS_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.timeout = Duration::from_secs(parsed);
        }
        if let Some(path) = var("EMPTASKS_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        config.resource_url()?;
        Ok(config)
    }

    /// Config pointing at `endpoint`, everything else default.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Config {
        Config {
            endpoint: endpoint.into(),
            ..Config::default()
        }
    }

    /// Full URL of the task collection, e.g. `http://localhost:8000/api/tasks`.
    pub fn resource_url(&self) -> Result<Url, ConfigError> {
        let joined = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.resource_path.trim_matches('/')
        );
        Url::parse(&joined).map_err(|e| ConfigError::InvalidEndpoint {
            url: joined.clone(),
            reason: e.to_string(),
        })
    }
}

/// `<data_local_dir>/emptasks/emptasks.log`, or `./emptasks.log` when the
/// platform has no data directory.
fn default_log_file() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("emptasks");
    p.push("emptasks.log");
    p
}
