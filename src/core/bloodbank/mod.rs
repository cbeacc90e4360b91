//! Blood bank inventory and request fulfilment
//!
//! Split into a pure planning layer ([`deduction`]) and the store-backed
//! service ([`service`]). Status thresholds live with the domain types in
//! [`crate::domain::blood`].

pub mod deduction;
pub mod service;

pub use deduction::{consolidate, plan_deduction, Draw, TypeTotal};
pub use service::{BloodBankService, BLOOD_BANK_COLLECTION, BLOOD_REQUESTS_COLLECTION};
