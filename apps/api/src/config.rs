//! # API Configuration
//!
//! Server, database and logging settings for the `fabstock-api` binary.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Layers                                 │
//! │                                                                         │
//! │  1. Defaults            ApiConfig::default()                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. TOML file           --config <path>, else                           │
//! │         │               <platform config dir>/fabstock/api.toml         │
//! │         ▼                                                               │
//! │  3. Environment         FABSTOCK_BIND_ADDR, FABSTOCK_PORT,              │
//! │         │               FABSTOCK_DB_PATH, FABSTOCK_DB_MAX_CONNECTIONS,  │
//! │         │               FABSTOCK_LOG                                    │
//! │         ▼                                                               │
//! │  4. validate()          rejects an unusable configuration at startup    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/fabstock/fabstock.db"
//! max_connections = 5
//!
//! [logging]
//! filter = "info,fabstock_api=debug"
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> PathBuf {
    PathBuf::from("fabstock.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_filter() -> String {
    "info,fabstock_api=debug,fabstock_db=info".to_string()
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete configuration for the API process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Loads configuration: defaults, then file, then environment.
    ///
    /// ## Arguments
    /// * `config_path` - Explicit file; falls back to the platform config dir
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading API config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies `FABSTOCK_*` overrides read through `var`.
    ///
    /// Taking the lookup as a parameter keeps tests off the process
    /// environment.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("FABSTOCK_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = var("FABSTOCK_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("FABSTOCK_PORT", format!("'{}' is not a port", port)))?;
        }

        if let Some(path) = var("FABSTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = var("FABSTOCK_DB_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse().map_err(|_| {
                ConfigError::invalid("FABSTOCK_DB_MAX_CONNECTIONS", format!("'{}' is not a number", max))
            })?;
        }

        if let Some(filter) = var("FABSTOCK_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Rejects configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::invalid(
                "server.bind_addr",
                format!("'{}' is not an IP address", self.server.bind_addr),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be greater than 0"));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections", "must be greater than 0"));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::invalid("server.bind_addr", "not an IP address"))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// `<config dir>/fabstock/api.toml` on this platform.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fabstock", "fabstock")
            .map(|dirs| dirs.config_dir().join("api.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, PathBuf::from("fabstock.db"));
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ApiConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ApiConfig::default();
        config
            .apply_overrides(env(&[
                ("FABSTOCK_PORT", "3000"),
                ("FABSTOCK_DB_PATH", "/tmp/atelier.db"),
                ("FABSTOCK_LOG", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, PathBuf::from("/tmp/atelier.db"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_overrides(env(&[("FABSTOCK_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = ApiConfig::default();
        config.server.bind_addr = "localhost:80".to_string();
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let mut config = ApiConfig::default();
        config.server.bind_addr = "0.0.0.0".to_string();
        config.server.port = 8081;
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8081");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ApiConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ApiConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("fabstock-missing-config-does-not-exist.toml");
        let config = ApiConfig::load(Some(path)).unwrap();
        assert!(config.validate().is_ok());
    }
}
