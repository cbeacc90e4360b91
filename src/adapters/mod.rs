//! External system adapters
//!
//! Record store backends (in-memory, PostgreSQL) plus the authentication
//! provider. Core services depend only on the traits in [`store`] and
//! [`auth`], never on a concrete backend.

pub mod auth;
pub mod memory;
pub mod postgresql;
pub mod store;
