//! Backend configuration, read from `PLANNER_*` environment variables.
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DATA_DIR_ENV: &str = "PLANNER_DATA_DIR";
pub const BIND_ADDR_ENV: &str = "PLANNER_BIND_ADDR";
pub const CORS_ORIGIN_ENV: &str = "PLANNER_CORS_ORIGIN";
pub const OVERRIDE_RETENTION_ENV: &str = "PLANNER_OVERRIDE_RETENTION";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DATA_DIRECTORY_NAME: &str = "Finance Planner";

/// What happens to a definition's monthly overrides when it is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverrideRetention {
    /// Keep them in storage; they stop showing up because the definition is gone
    #[default]
    Retain,
    /// Delete them together with the definition
    Cascade,
}

impl FromStr for OverrideRetention {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(OverrideRetention::Retain),
            "cascade" => Ok(OverrideRetention::Cascade),
            _ => Err(ConfigError::InvalidValue {
                key: OVERRIDE_RETENTION_ENV,
                value: raw.to_string(),
                reason: "expected 'retain' or 'cascade'".to_string(),
            }),
        }
    }
}

impl fmt::Display for OverrideRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideRetention::Retain => write!(f, "retain"),
            OverrideRetention::Cascade => write!(f, "cascade"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub data_directory: PathBuf,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub override_retention: OverrideRetention,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            override_retention: OverrideRetention::default(),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = read(DATA_DIR_ENV) {
            config.data_directory = PathBuf::from(dir.trim());
        }
        if let Some(addr) = read(BIND_ADDR_ENV) {
            config.bind_addr = addr.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: BIND_ADDR_ENV,
                    value: addr.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(origin) = read(CORS_ORIGIN_ENV) {
            let origin = origin.trim().to_string();
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: CORS_ORIGIN_ENV,
                    value: origin,
                    reason: "origin must start with http:// or https://".to_string(),
                });
            }
            config.cors_origin = origin;
        }
        if let Some(retention) = read(OVERRIDE_RETENTION_ENV) {
            config.override_retention = retention.parse()?;
        }

        Ok(config)
    }
}

/// `<Documents>/Finance Planner`, else `<home>/Finance Planner`, else `./data`
fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(DATA_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}
