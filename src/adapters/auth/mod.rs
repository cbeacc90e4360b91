//! Authentication adapters

pub mod local;
pub mod provider;

pub use local::LocalAuthProvider;
pub use provider::{resolve_role, AuthProvider, AuthenticatedUser, BearerToken};
