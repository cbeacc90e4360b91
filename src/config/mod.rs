//! Configuration management for Ward.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Ward uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`WARD_*` prefix)
//! - Default values for optional settings
//! - Per-section validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ward::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ward.toml")?;
//!
//! println!("Store target: {:?}", config.store_target);
//! if let Some(pg) = &config.postgresql {
//!     println!("Pool size: {}", pg.max_connections);
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthConfig, Environment, LoggingConfig, PostgresConfig, StoreTarget,
    WardConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
