//! In-memory record store backend

pub mod store;

pub use store::MemoryStore;
