//! Domain error types
//!
//! The error hierarchy for Ward. All errors are domain-specific and don't
//! expose third-party types. The taxonomy covers not-found, insufficient
//! resource, validation, and persistence failures; every variant carries a
//! human-readable message and none are retried automatically.

use thiserror::Error;

/// Main Ward error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum WardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (missing or malformed fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A requested record or collection entry is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested blood type has no batches in inventory
    #[error("No {0} blood type found in inventory")]
    UnknownBloodType(String),

    /// The requested units exceed what the inventory holds
    #[error("Insufficient {blood_type} blood units. Available: {available}, Requested: {requested}")]
    InsufficientUnits {
        blood_type: String,
        available: u32,
        requested: u32,
    },

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Record-store-specific errors
///
/// Errors that occur when talking to the record store. These don't expose
/// the underlying driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to record store: {0}")]
    ConnectionFailed(String),

    /// Record not found at the given collection/key
    #[error("Record not found: {collection}/{key}")]
    RecordNotFound { collection: String, key: String },

    /// A write operation failed
    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    /// A read/query operation failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored data could not be interpreted
    #[error("Invalid record data: {0}")]
    InvalidData(String),

    /// Schema setup failed
    #[error("Failed to initialize store schema: {0}")]
    SchemaFailed(String),
}

/// Authentication-specific errors
///
/// Messages mirror what callers are shown on sign-in failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account exists for the given email
    #[error("No account found with this email")]
    AccountNotFound,

    /// Password verification failed
    #[error("Incorrect password")]
    IncorrectPassword,

    /// An account already exists for the given email
    #[error("An account with this email already exists: {0}")]
    EmailInUse(String),

    /// Bearer credential could not be verified
    #[error("Unauthorized: Invalid token")]
    InvalidToken,

    /// No bearer credential was supplied
    #[error("Unauthorized: No token provided")]
    MissingToken,

    /// Account payload failed validation
    #[error("Invalid account details: {0}")]
    InvalidAccount(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for WardError {
    fn from(err: std::io::Error) -> Self {
        WardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WardError {
    fn from(err: serde_json::Error) -> Self {
        WardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WardError {
    fn from(err: toml::de::Error) -> Self {
        WardError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ward_error_display() {
        let err = WardError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_insufficient_units_reports_both_counts() {
        let err = WardError::InsufficientUnits {
            blood_type: "O+".to_string(),
            available: 3,
            requested: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("Available: 3"));
        assert!(msg.contains("Requested: 7"));
        assert!(msg.contains("O+"));
    }

    #[test]
    fn test_unknown_blood_type_message() {
        let err = WardError::UnknownBloodType("AB-".to_string());
        assert_eq!(err.to_string(), "No AB- blood type found in inventory");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::RecordNotFound {
            collection: "patients".to_string(),
            key: "abc".to_string(),
        };
        let ward_err: WardError = store_err.into();
        assert!(matches!(ward_err, WardError::Store(_)));
    }

    #[test]
    fn test_auth_error_conversion() {
        let auth_err = AuthError::IncorrectPassword;
        let ward_err: WardError = auth_err.into();
        assert!(matches!(ward_err, WardError::Auth(_)));
        assert!(ward_err.to_string().contains("Incorrect password"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let ward_err: WardError = io_err.into();
        assert!(matches!(ward_err, WardError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let ward_err: WardError = json_err.into();
        assert!(matches!(ward_err, WardError::Serialization(_)));
    }

    #[test]
    fn test_ward_error_implements_std_error() {
        let err = WardError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
