//! PostgreSQL record store backend

pub mod adapter;
pub mod client;

pub use adapter::PostgresStore;
pub use client::PostgresClient;
