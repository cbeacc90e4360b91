//! Logging and observability
//!
//! Structured logging with configurable levels, console output, and optional
//! local file logging with rotation.
//!
//! # Example
//!
//! ```no_run
//! use ward::logging::init_logging;
//! use ward::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ward::log_error_with_context;
/// use ward::domain::WardError;
///
/// let error = WardError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
