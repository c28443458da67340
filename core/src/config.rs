//! Client configuration: which backend to use and how to reach it.
//!
//! Layering is defaults < TOML file < `TODOLIST_*` environment variables.
//! Command-line overrides are applied by the caller on top.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::adapter::{LocalAdapter, RemoteAdapter, SyncAdapter};
use crate::client::{TodoClient, DEFAULT_BASE_URL};
use crate::local::{LocalStore, DEFAULT_FILE_NAME};
use crate::retry::RetryPolicy;
use crate::transport::UreqTransport;

pub const ENV_BACKEND: &str = "TODOLIST_BACKEND";
pub const ENV_BASE_URL: &str = "TODOLIST_BASE_URL";
pub const ENV_STORE: &str = "TODOLIST_STORE";

const APP_DIR: &str = "todolist";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown backend {0:?} (expected \"remote\" or \"local\")")]
    InvalidBackend(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Remote,
    Local,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "rest" => Ok(Backend::Remote),
            "local" | "file" => Ok(Backend::Local),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Storage file; defaults to `<data dir>/todolist/todos.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl LocalConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    2_000
}

/// `<data dir>/todolist/todos.json`, or `./todos.json` when the platform has
/// no data directory.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(DEFAULT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
}

/// `<config dir>/todolist/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Load from an explicit file, or from the default location if a file
    /// exists there, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        debug!(?config, "resolved client config");
        Ok(config)
    }

    /// Apply `TODOLIST_*` overrides looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.remote.base_url = base_url;
        }
        if let Some(path) = lookup(ENV_STORE) {
            self.local.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.remote.timeout_ms)
    }

    /// Build the adapter this configuration selects.
    pub fn adapter(&self) -> Box<dyn SyncAdapter> {
        match self.backend {
            Backend::Remote => Box::new(RemoteAdapter::new(
                TodoClient::new(&self.remote.base_url),
                UreqTransport::new(self.timeout()),
                self.retry.policy(),
            )),
            Backend::Local => Box::new(LocalAdapter::new(LocalStore::new(
                self.local.resolved_path(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_point_at_local_rest_server() {
        let config = ClientConfig::default();
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.remote.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry.policy(), RetryPolicy::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let raw = r#"
            backend = "local"
            [retry]
            max_attempts = 5
            [local]
            path = "/tmp/todos.json"
        "#;
        let config = ClientConfig::from_toml_str(raw, Path::new("config.toml")).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_backoff_ms, 100);
        assert_eq!(config.remote, RemoteConfig::default());
        assert_eq!(config.local.resolved_path(), PathBuf::from("/tmp/todos.json"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = ClientConfig::from_toml_str("backend = ", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BACKEND, "LOCAL"),
            (ENV_BASE_URL, "http://example.test"),
            (ENV_STORE, "/data/todos.json"),
        ]
        .into_iter()
        .collect();
        let mut config = ClientConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.remote.base_url, "http://example.test");
        assert_eq!(config.local.path, Some(PathBuf::from("/data/todos.json")));
    }

    #[test]
    fn bad_backend_name_is_rejected() {
        let err = "sqlite".parse::<Backend>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackend(_)));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.policy().max_attempts, 1);
    }
}
