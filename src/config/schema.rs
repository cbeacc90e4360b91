//! Configuration schema types
//!
//! The structure of `ward.toml`. Only the store backend named by
//! `store_target` is required to have its section present and valid.

use serde::{Deserialize, Serialize};

/// Record store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTarget {
    /// In-process memory store (development and tests)
    Memory,
    /// PostgreSQL-backed store
    PostgreSQL,
}

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main Ward configuration
///
/// This is the root structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Record store target (memory or postgresql)
    pub store_target: StoreTarget,

    /// PostgreSQL configuration (required if store_target = postgresql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgresql: Option<PostgresConfig>,

    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        // Only the active backend section is validated; both may be present.
        if self.store_target == StoreTarget::PostgreSQL {
            match self.postgresql {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "postgresql configuration is required when store_target = 'postgresql'"
                            .to_string(),
                    )
                }
            }
        }

        self.auth.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// A memory-backed configuration with defaults, used by tests
    pub fn memory_defaults() -> Self {
        Self {
            application: ApplicationConfig {
                log_level: default_log_level(),
                dry_run: false,
            },
            environment: Environment::Development,
            store_target: StoreTarget::Memory,
            postgresql: None,
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (report without writing to the store)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// PostgreSQL backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Connection string, e.g. `host=localhost user=ward dbname=ward`
    pub connection_string: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Timeout for acquiring a connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,

    /// Per-statement timeout
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_seconds: u64,
}

impl PostgresConfig {
    fn validate(&self) -> Result<(), String> {
        if self.connection_string.trim().is_empty() {
            return Err("postgresql.connection_string cannot be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("postgresql.max_connections must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum accepted password length for new accounts
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl AuthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_password_length < 6 {
            return Err("auth.min_password_length must be at least 6".to_string());
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> usize {
    8
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_statement_timeout() -> u64 {
    30
}

fn default_min_password_length() -> usize {
    6
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> WardConfig {
        WardConfig::memory_defaults()
    }

    #[test]
    fn test_memory_config_validates() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_postgresql_target_requires_section() {
        let mut config = base_config();
        config.store_target = StoreTarget::PostgreSQL;
        let err = config.validate().unwrap_err();
        assert!(err.contains("postgresql configuration is required"));
    }

    #[test]
    fn test_postgresql_empty_connection_string_rejected() {
        let mut config = base_config();
        config.store_target = StoreTarget::PostgreSQL;
        config.postgresql = Some(PostgresConfig {
            connection_string: "  ".to_string(),
            max_connections: 4,
            connection_timeout_seconds: 10,
            statement_timeout_seconds: 30,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = base_config();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_short_min_password_length_rejected() {
        let mut config = base_config();
        config.auth.min_password_length = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_target_parses_lowercase() {
        let target: StoreTarget = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(target, StoreTarget::PostgreSQL);
        let target: StoreTarget = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(target, StoreTarget::Memory);
    }
}
