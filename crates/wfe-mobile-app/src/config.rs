/*
[INPUT]:  YAML configuration file and WFE__* environment variables
[OUTPUT]: Validated client configuration
[POS]:    Configuration layer - server endpoint and tracked processes
[UPDATE]: When adding new configuration options
*/

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use wfe_mobile_adapter::{ClientConfig, DEFAULT_BASE_URL};

use crate::error::{AppError, Result};

const ENV_PREFIX: &str = "WFE";

/// Top-level configuration for the mobile client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// REST endpoint settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Process types shown on the main screen, in display order
    #[serde(default = "default_tracked_processes")]
    pub tracked_processes: Vec<TrackedProcessConfig>,
    /// Paging forwarded to the "my tasks" query
    #[serde(default)]
    pub my_tasks: MyTasksConfig,
}

/// REST endpoint settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the REST API, deployment prefix included
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// One tracked process type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackedProcessConfig {
    /// Process id fetched via `process/{id}`
    pub id: i64,
    /// Badge shown next to the process title
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MyTasksConfig {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            tracked_processes: default_tracked_processes(),
            my_tasks: MyTasksConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for MyTasksConfig {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    20
}

fn default_tracked_processes() -> Vec<TrackedProcessConfig> {
    (1..=3)
        .map(|n| TrackedProcessConfig {
            id: 42 + n,
            label: Some(format!("Process {n}")),
        })
        .collect()
}

impl ServerConfig {
    /// Transport settings for the adapter client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: optional YAML file, then `WFE__SECTION__KEY` overrides.
    ///
    /// With no explicit path the per-user config file is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
            }
            None => {
                if let Some(default_path) = default_config_path().filter(|p| p.exists()) {
                    builder = builder
                        .add_source(File::from(default_path).format(FileFormat::Yaml).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Tracked ids in display order
    pub fn tracked_ids(&self) -> Vec<i64> {
        self.tracked_processes.iter().map(|p| p.id).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracked_processes.is_empty() {
            return Err(AppError::Config(
                "at least one tracked process is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for process in &self.tracked_processes {
            if !seen.insert(process.id) {
                return Err(AppError::Config(format!(
                    "duplicate tracked process id {}",
                    process.id
                )));
            }
        }
        if self.my_tasks.page_size == 0 {
            return Err(AppError::Config("my_tasks.page_size must be positive".to_string()));
        }
        if self.server.base_url.trim().is_empty() {
            return Err(AppError::Config("server.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// `<config_dir>/wfe-mobile/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wfe-mobile").join("config.yaml"))
}
