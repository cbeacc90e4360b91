//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod seed;
pub mod status;
pub mod validate;
