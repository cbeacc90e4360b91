//! Core business logic
//!
//! Services here depend on the store and auth traits, never on a concrete
//! backend. The blood bank owns inventory and request fulfilment, the
//! registry owns the remaining administrative collections, and idgen
//! allocates the human-readable display IDs both hand out.

pub mod bloodbank;
pub mod idgen;
pub mod registry;
