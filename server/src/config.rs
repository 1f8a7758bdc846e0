//! Runtime configuration, read from environment variables.
//!
//! Unset variables fall back to defaults. A variable that is set but does
//! not parse is an error, and the server refuses to start.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which storage backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}', expected 'mongo' or 'memory'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub storage: StorageBackend,
    /// How long in-flight requests may run after shutdown starts.
    pub shutdown_grace: Duration,
    /// Deadline for a single request.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: "demo_todo".to_string(),
            collection: "todo".to_string(),
            storage: StorageBackend::Mongo,
            shutdown_grace: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: load(&lookup, "HOST", defaults.host)?,
            port: load(&lookup, "PORT", defaults.port)?,
            mongo_uri: load(&lookup, "MONGODB_URI", defaults.mongo_uri)?,
            database: load(&lookup, "MONGODB_DATABASE", defaults.database)?,
            collection: load(&lookup, "MONGODB_COLLECTION", defaults.collection)?,
            storage: load(&lookup, "TODO_STORAGE", defaults.storage)?,
            shutdown_grace: Duration::from_secs(load(
                &lookup,
                "SHUTDOWN_GRACE_SECS",
                defaults.shutdown_grace.as_secs(),
            )?),
            request_timeout: Duration::from_secs(load(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
