//! Master configuration.
//!
//! Loaded once at startup from a YAML file, then patched from the
//! environment. An invalid configuration is fatal: the process never starts
//! accepting jobs with it.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use forest_core::TaskSpec;

use crate::gateway::Deadlines;

/// Locations tried, in order, when no config path is given.
const DEFAULT_PATHS: [&str; 2] = ["configs/config.yaml", "config.yaml"];

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found (searched: {searched})")]
    NotFound { searched: String },

    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for environment variable {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Master configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub workers: WorkersConfig,
    pub gateway: GatewayConfig,
    pub batch: BatchConfig,
    /// Tasks executed by `run-batch`, in declaration order.
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Worker gRPC addresses, `host:port` or full URIs.
    pub addresses: Vec<String>,
}

/// Per-call budgets, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub train_timeout_secs: u64,
    pub predict_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            train_timeout_secs: 10,
            predict_timeout_secs: 5,
            health_timeout_secs: 2,
            connect_timeout_secs: 3,
        }
    }
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Upper bound on concurrently executing tasks; defaults to the pool size.
    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Load, patch from the process environment, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => DEFAULT_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|p| p.is_file())
                .ok_or_else(|| ConfigError::NotFound {
                    searched: DEFAULT_PATHS.join(", "),
                })?,
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                searched: path.display().to_string(),
            },
            _ => ConfigError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let mut config = Self::from_yaml_str(&raw)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(path = %path.display(), env = %config.app.env, "Configuration loaded");
        Ok(config)
    }

    /// Parse a YAML document without validating it.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply `SERVER_PORT`, `WORKERS_ADDRESSES` (comma-separated) and `APP_ENV`.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("SERVER_PORT") {
            self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "SERVER_PORT",
                value,
            })?;
        }

        if let Some(value) = lookup("WORKERS_ADDRESSES") {
            self.workers.addresses = value
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(value) = lookup("APP_ENV") {
            self.app.env = value;
        }

        Ok(())
    }

    /// Reject configurations the master cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers.addresses.is_empty() {
            return Err(ConfigError::Invalid(
                "workers.addresses must list at least one worker".to_string(),
            ));
        }

        if let Some(blank) = self.workers.addresses.iter().position(|a| a.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "workers.addresses[{}] is empty",
                blank
            )));
        }

        let gateway = &self.gateway;
        for (name, secs) in [
            ("train_timeout_secs", gateway.train_timeout_secs),
            ("predict_timeout_secs", gateway.predict_timeout_secs),
            ("health_timeout_secs", gateway.health_timeout_secs),
            ("connect_timeout_secs", gateway.connect_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("gateway.{} must be positive", name)));
            }
        }

        if self.batch.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "batch.max_concurrency must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Worker addresses as URIs; bare `host:port` entries get `http://`.
    pub fn worker_endpoints(&self) -> Vec<String> {
        self.workers
            .addresses
            .iter()
            .map(|a| {
                let a = a.trim();
                if a.contains("://") {
                    a.to_string()
                } else {
                    format!("http://{}", a)
                }
            })
            .collect()
    }

    pub fn deadlines(&self) -> Deadlines {
        Deadlines {
            train: Duration::from_secs(self.gateway.train_timeout_secs),
            predict: Duration::from_secs(self.gateway.predict_timeout_secs),
            health: Duration::from_secs(self.gateway.health_timeout_secs),
        }
    }

    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.server.port))
    }
}
