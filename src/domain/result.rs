//! Result type alias for Ward

use super::errors::WardError;

/// Result type alias for Ward operations
///
/// This is a convenience type alias that uses `WardError` as the error type.
/// Use this throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, WardError>;
