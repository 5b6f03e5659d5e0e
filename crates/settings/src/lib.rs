//! Service configuration, loaded from YAML and overridable from the environment.
//!
//! # Sample Config
//! ```yaml
//! database:
//!   url: localhost:5432
//!   username: hwinv
//!   password: hwinv
//!   database_name: hwinv
//! web:
//!   bind_addr: 0.0.0.0:8080
//! catalog:
//!   directory: catalogs
//! inventory:
//!   default_page_size: 50
//!   max_page_size: 500
//!   strict_transitions: false
//! logging:
//!   max_level: INFO
//! ```
//!
//! Any key can be overridden with an `HWINV__SECTION__KEY` environment variable,
//! e.g. `HWINV__DATABASE__PASSWORD`.

use std::{fmt, path::Path, path::PathBuf};

use models::TransitionPolicy;
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

pub use config::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config_data/config.yaml";

#[derive(Debug, Deserialize, Clone)]
pub struct HwInvConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggingLevel {
    ERROR,
    WARN,
    #[default]
    INFO,
    DEBUG,
    TRACE,
    OFF,
}

impl<'de> Deserialize<'de> for LoggingLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = String::deserialize(deserializer)?;

        Ok(match v.as_str() {
            "ERROR" => Self::ERROR,
            "WARN" => Self::WARN,
            "INFO" => Self::INFO,
            "DEBUG" => Self::DEBUG,
            "TRACE" => Self::TRACE,
            "OFF" => Self::OFF,
            other => Err(serde::de::Error::custom(format!(
                "Bad logging level specifier {other}"
            )))?,
        })
    }
}

impl From<LoggingLevel> for LevelFilter {
    fn from(value: LoggingLevel) -> Self {
        match value {
            LoggingLevel::ERROR => LevelFilter::ERROR,
            LoggingLevel::WARN => LevelFilter::WARN,
            LoggingLevel::INFO => LevelFilter::INFO,
            LoggingLevel::DEBUG => LevelFilter::DEBUG,
            LoggingLevel::TRACE => LevelFilter::TRACE,
            LoggingLevel::OFF => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_file: Option<String>,

    #[serde(default)]
    pub max_level: LoggingLevel,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: HostPortPair,
    pub username: String,
    pub password: String,
    pub database_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.url.host, self.url.port, self.database_name
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub bind_addr: HostPortPair,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: HostPortPair {
                host: "0.0.0.0".to_owned(),
                port: 8080,
            },
        }
    }
}

/// Where the per-type catalog documents (`cpu.json`, `ram.json`, ...) live.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub directory: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("catalogs"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "max_page_size")]
    pub max_page_size: i64,
    #[serde(default)]
    pub strict_transitions: bool,
}

fn default_page_size() -> i64 {
    50
}

fn max_page_size() -> i64 {
    500
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
            strict_transitions: false,
        }
    }
}

impl InventoryConfig {
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPortPair {
    pub host: String,
    pub port: u16,
}

impl<'de> Deserialize<'de> for HostPortPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let base = String::deserialize(deserializer)?;

        let (host, port) = base
            .rsplit_once(':')
            .ok_or(serde::de::Error::custom(format!(
                "Failed to split {base} into component host and port"
            )))?;

        let port = port.parse().map_err(|_e| {
            serde::de::Error::custom(format!("Couldn't parse out port as an int from {port}"))
        })?;

        Ok(HostPortPair {
            host: host.to_owned(),
            port,
        })
    }
}

impl fmt::Display for HostPortPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Reads the YAML file at `path` and layers `HWINV__*` environment variables on
/// top of it.
pub fn load(path: impl AsRef<Path>) -> Result<HwInvConfig, ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix("HWINV")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
