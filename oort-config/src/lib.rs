// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-variable configuration for `bins/oortd` and `bins/oort-poller`, typed in place of the original `config.NewConfig()` (`poller/main.go`).

use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} has a malformed value {value:?}: {reason}")]
    Malformed { name: &'static str, value: String, reason: String },
}

/// The Neo4j graph store endpoint (kept even though this workspace ships only the
/// in-memory reference `Store` backend — the binaries still need somewhere to read these
/// from for whatever backend is wired in).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub uri: String,
    pub db_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub neo4j: Neo4jConfig,
    pub nats_uri: String,
    pub poller_interval: Duration,
    pub cached_permissions: bool,
}

impl Config {
    /// Reads `NEO4J_URI`, `NEO4J_DB`, `NATS_URI`, `POLLER_INTERVAL_MS`,
    /// `CACHED_PERMISSIONS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|name| env::var(name).ok())
    }

    /// Testable without touching the real process environment.
    fn from_reader(read: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let uri = required(&read, "NEO4J_URI")?;
        let db_name = required(&read, "NEO4J_DB")?;
        let nats_uri = required(&read, "NATS_URI")?;
        let interval_raw = required(&read, "POLLER_INTERVAL_MS")?;
        let cached_raw = required(&read, "CACHED_PERMISSIONS")?;

        let interval_ms: u64 = interval_raw.parse().map_err(|err| ConfigError::Malformed {
            name: "POLLER_INTERVAL_MS",
            value: interval_raw.clone(),
            reason: format!("{err}"),
        })?;
        let cached_permissions = parse_bool(&cached_raw).ok_or_else(|| ConfigError::Malformed {
            name: "CACHED_PERMISSIONS",
            value: cached_raw.clone(),
            reason: "expected true/false".into(),
        })?;

        Ok(Self {
            neo4j: Neo4jConfig { uri, db_name },
            nats_uri,
            poller_interval: Duration::from_millis(interval_ms),
            cached_permissions,
        })
    }
}

fn required(read: &impl Fn(&'static str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    read(name).filter(|v| !v.is_empty()).ok_or(ConfigError::Missing(name))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn reader(vars: HashMap<&'static str, &'static str>) -> impl Fn(&'static str) -> Option<String> {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("NEO4J_URI", "bolt://localhost:7687"),
            ("NEO4J_DB", "oort"),
            ("NATS_URI", "nats://localhost:4222"),
            ("POLLER_INTERVAL_MS", "500"),
            ("CACHED_PERMISSIONS", "true"),
        ])
    }

    #[test]
    fn loads_a_complete_environment() {
        let config = Config::from_reader(reader(full_env())).unwrap();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.poller_interval, Duration::from_millis(500));
        assert!(config.cached_permissions);
    }

    #[test]
    fn missing_variable_is_an_error() {
        let mut vars = full_env();
        vars.remove("NATS_URI");
        assert!(matches!(Config::from_reader(reader(vars)), Err(ConfigError::Missing("NATS_URI"))));
    }

    #[test]
    fn malformed_interval_is_an_error() {
        let mut vars = full_env();
        vars.insert("POLLER_INTERVAL_MS", "not-a-number");
        assert!(matches!(
            Config::from_reader(reader(vars)),
            Err(ConfigError::Malformed { name: "POLLER_INTERVAL_MS", .. })
        ));
    }
}
