// Ward - Hospital Administration Tool
// Copyright (c) 2026 Ward Contributors
// Licensed under the MIT License

//! # Ward - Hospital Administration
//!
//! Ward is a hospital administration backend built in Rust. It manages
//! patients, appointments, lab tests, staff, expenses, and a blood bank over
//! a pluggable record store, with display-ID allocation and greedy blood
//! inventory deduction at request time.
//!
//! ## Architecture
//!
//! Ward follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (blood bank, registry, display IDs)
//! - [`adapters`] - External integrations (record store backends, auth)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ward::adapters::memory::MemoryStore;
//! use ward::core::bloodbank::BloodBankService;
//! use ward::domain::blood::{BloodBatch, BloodType};
//! use ward::domain::{Role, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let blood_bank = BloodBankService::new(store);
//!     let session = Session::new("uid", "admin@ward.local", "Admin", true, Role::Admin);
//!
//!     let expiry = chrono::NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
//!     blood_bank
//!         .add_batch(&session, BloodBatch::new(BloodType::OPositive, 12, expiry))
//!         .await?;
//!
//!     for row in blood_bank.consolidated().await? {
//!         println!("{} {} {}", row.blood_type, row.units, row.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Display IDs
//!
//! Every administrative entity carries a human-readable ID like `P-01` or
//! `LT-14`. The next number for a prefix is the maximum found in a snapshot
//! plus one:
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use ward::core::idgen::next_display_id;
//! use ward::domain::ids::IdPrefix;
//!
//! let empty = BTreeMap::new();
//! assert_eq!(next_display_id(IdPrefix::Patient, &empty), "P-01");
//! ```
//!
//! ## Error Handling
//!
//! Ward uses the [`domain::WardError`] type for all errors:
//!
//! ```rust,no_run
//! use ward::domain::WardError;
//!
//! fn example() -> Result<(), WardError> {
//!     let config = ward::config::load_config("ward.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Ward uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting up");
//! warn!(blood_type = "O+", "Inventory running low");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
