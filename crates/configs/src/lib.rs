use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The all encompassing service configuration.
///
/// Every section carries its own defaults, so an absent or empty file resolves
/// to a runnable configuration. Sections present in a file overlay the
/// defaults field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub num_processes: usize,
    /// Upper bound on how long shutdown waits for the curator to close.
    pub shutdown_timeout_secs: u64,
    pub logger: LoggerConfig,
    pub stats: StatsConfig,
    pub curator: CuratorConfig,
    pub http_server: HttpServerConfig,
    pub stats_server: StatsServerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            num_processes: default_num_processes(),
            shutdown_timeout_secs: 10,
            logger: LoggerConfig::default(),
            stats: StatsConfig::default(),
            curator: CuratorConfig::default(),
            http_server: HttpServerConfig::default(),
            stats_server: StatsServerConfig::default(),
        }
    }
}

/// Host logical CPU count, falling back to a single worker.
pub fn default_num_processes() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `info` or `debug,axum=info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: "info".into(), format: LogFormat::Compact }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Prefix applied to every metric name.
    pub prefix: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { prefix: "leaps".into() }
    }
}

/// Selects which document store backend the curator builds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentStoreConfig {
    #[serde(rename = "type")]
    pub backend_type: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self { backend_type: "memory".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CuratorConfig {
    pub document_store: DocumentStoreConfig,
    /// Largest document content accepted, in bytes.
    pub max_document_size: usize,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            document_store: DocumentStoreConfig::default(),
            max_document_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpServerConfig {
    pub address: String,
    /// Route prefix for the document API.
    pub path: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self { address: "127.0.0.1:8001".into(), path: "/leaps".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsServerConfig {
    pub address: String,
    /// Route serving the metrics text.
    pub path: String,
}

impl Default for StatsServerConfig {
    fn default() -> Self {
        Self { address: "127.0.0.1:4040".into(), path: "/leaps/stats".into() }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceConfig {
    /// Resolve the configuration: defaults, overlaid by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn load_from_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a JSON document on top of the defaults.
pub fn from_json_str(content: &str) -> Result<ServiceConfig, serde_json::Error> {
    serde_json::from_str(content)
}
