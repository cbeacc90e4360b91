//! Domain models and types for Ward.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordKey`], [`IdPrefix`])
//! - **Entity models** ([`Patient`], [`Appointment`], [`LabTest`],
//!   [`StaffMember`], [`Expense`], [`BloodBatch`], [`BloodRequest`])
//! - **Error types** ([`WardError`], [`StoreError`], [`AuthError`])
//! - **Result type alias** ([`Result`])
//! - **Request-scoped sessions** ([`Session`], [`Role`])
//!
//! # Type Safety
//!
//! Ward uses the newtype pattern for identifiers so an opaque store key can
//! never be confused with a human-readable display ID, and a display-ID
//! prefix can never be reused across entity kinds.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use ward::domain::{Result, WardError};
//!
//! fn example(units: u32) -> Result<u32> {
//!     if units == 0 {
//!         return Err(WardError::Validation("units must be positive".into()));
//!     }
//!     Ok(units)
//! }
//! ```

pub mod blood;
pub mod errors;
pub mod ids;
pub mod records;
pub mod result;
pub mod session;

// Re-export commonly used types for convenience
pub use blood::{BatchStatus, BloodBatch, BloodRequest, BloodType, RequestStatus, Urgency};
pub use errors::{AuthError, StoreError, WardError};
pub use ids::{IdPrefix, RecordKey};
pub use records::{
    Appointment, AppointmentStatus, ContactInfo, Expense, ExpenseCategory, Gender, LabTest,
    LabTestStatus, Patient, PatientStatus, StaffCategory, StaffMember, StaffStatus,
};
pub use result::Result;
pub use session::{Role, Session};
