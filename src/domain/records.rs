//! Typed entity records
//!
//! The administrative entities Ward manages: patients, appointments, lab
//! tests, staff members, and expenses. Field names serialize to the legacy
//! camelCase layout the record store holds, so typed and untyped access see
//! the same documents.

use crate::domain::blood::BloodType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// Admission status of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatientStatus {
    #[default]
    Outpatient,
    Inpatient,
}

/// A patient registration record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub gender: Gender,
    pub department: String,
    #[serde(default)]
    pub status: PatientStatus,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    pub emergency_contact: String,
}

/// Appointment lifecycle status
///
/// Stored lowercase. Cancelled and completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Whether a transition to `next` is allowed
    ///
    /// Scheduled can be confirmed, cancelled, or completed directly;
    /// confirmed can be cancelled or completed; terminal states admit
    /// nothing further.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, next) {
            (Scheduled, Confirmed) | (Scheduled, Cancelled) | (Scheduled, Completed) => true,
            (Confirmed, Cancelled) | (Confirmed, Completed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// An appointment booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub patient: String,
    pub doctor: String,
    pub department: String,
    pub room: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

/// Lab test processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabTestStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Critical,
}

/// A lab test order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTest {
    pub test_name: String,
    pub patient: String,
    pub doctor: String,
    #[serde(default)]
    pub status: LabTestStatus,
    pub test_date: NaiveDate,
    pub test_time: String,
}

/// Staff role category, also used for sign-in role resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffCategory {
    #[default]
    Doctor,
    Admin,
    Technician,
    Receptionist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
    #[serde(rename = "On Leave")]
    OnLeave,
}

/// Contact details, nested the way staff records store them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
}

/// A staff member record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub category: StaffCategory,
    #[serde(default)]
    pub contact: ContactInfo,
    pub joining_date: NaiveDate,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default = "default_shift_start")]
    pub shift_start: String,
    #[serde(default = "default_shift_end")]
    pub shift_end: String,
    #[serde(default = "default_working_days")]
    pub working_days: Vec<String>,
}

fn default_shift_start() -> String {
    "09:00".to_string()
}

fn default_shift_end() -> String {
    "17:00".to_string()
}

fn default_working_days() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

/// Expense bookkeeping category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    #[default]
    Equipment,
    Supplies,
    Salary,
    Utilities,
    Maintenance,
}

/// An expense entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub description: String,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: NaiveDate,
    pub payment_method: String,
    #[serde(default)]
    pub vendor: String,
}
