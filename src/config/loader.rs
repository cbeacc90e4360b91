//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::WardConfig;
use crate::domain::errors::WardError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WardConfig
/// 4. Applies environment variable overrides (WARD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is missing, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<WardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: WardConfig = toml::from_str(&contents)
        .map_err(|e| WardError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| WardError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid substitution pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(WardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the WARD_* prefix
///
/// Variables follow the pattern WARD_<SECTION>_<KEY>, e.g.
/// WARD_APPLICATION_LOG_LEVEL or WARD_POSTGRESQL_CONNECTION_STRING.
fn apply_env_overrides(config: &mut WardConfig) {
    use super::schema::StoreTarget;

    if let Ok(val) = std::env::var("WARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("WARD_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("WARD_STORE_TARGET") {
        match val.to_lowercase().as_str() {
            "memory" => config.store_target = StoreTarget::Memory,
            "postgresql" => config.store_target = StoreTarget::PostgreSQL,
            other => tracing::warn!(value = other, "Ignoring unknown WARD_STORE_TARGET"),
        }
    }

    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("WARD_POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = val;
        }
        if let Ok(val) = std::env::var("WARD_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(n) = val.parse() {
                pg.max_connections = n;
            }
        }
    }

    if let Ok(val) = std::env::var("WARD_AUTH_MIN_PASSWORD_LENGTH") {
        if let Ok(n) = val.parse() {
            config.auth.min_password_length = n;
        }
    }

    if let Ok(val) = std::env::var("WARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("WARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
