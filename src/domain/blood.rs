//! Blood bank domain types
//!
//! Blood batches, requests, and the derived batch status. Status thresholds
//! are fixed constants recomputed whenever a batch's unit count changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight ABO/Rh blood type combinations
///
/// Matching is always exact; there is no cross-type substitution (no
/// universal-donor logic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All blood types, in form order
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    /// Returns the conventional label, e.g. `"O+"`
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown blood type: {s}"))
    }
}

/// Derived availability status of a batch (or a consolidated type total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatchStatus {
    Critical,
    Low,
    #[default]
    Stable,
    High,
}

/// Unit counts at or below this are Low (unless zero)
pub const LOW_THRESHOLD: u32 = 5;
/// Unit counts at or above this are High
pub const HIGH_THRESHOLD: u32 = 20;

impl BatchStatus {
    /// Derives the status from a unit count
    ///
    /// `0 -> Critical`, `1..=5 -> Low`, `6..=19 -> Stable`, `>= 20 -> High`.
    pub fn from_units(units: u32) -> Self {
        if units == 0 {
            BatchStatus::Critical
        } else if units <= LOW_THRESHOLD {
            BatchStatus::Low
        } else if units >= HIGH_THRESHOLD {
            BatchStatus::High
        } else {
            BatchStatus::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Critical => "Critical",
            BatchStatus::Low => "Low",
            BatchStatus::Stable => "Stable",
            BatchStatus::High => "High",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One inventory row: a batch of a specific blood type
///
/// Multiple batches may share the same blood type. `units` never goes
/// negative; deductions clamp at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodBatch {
    #[serde(rename = "type")]
    pub blood_type: BloodType,

    #[serde(default)]
    pub units: u32,

    #[serde(default)]
    pub status: BatchStatus,

    pub expiry_date: NaiveDate,
}

impl BloodBatch {
    /// Creates a batch with its status derived from the unit count
    pub fn new(blood_type: BloodType, units: u32, expiry_date: NaiveDate) -> Self {
        Self {
            blood_type,
            units,
            status: BatchStatus::from_units(units),
            expiry_date,
        }
    }
}

/// Urgency of a blood request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Critical,
    Emergency,
}

/// Lifecycle status of a blood request
///
/// Requests start Pending. Note that inventory is already consumed when the
/// request is created; a later rejection does not restore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A blood request as persisted in the `bloodRequests` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub blood_type: BloodType,
    pub units: u32,
    #[serde(default)]
    pub urgency: Urgency,
    pub patient_name: String,
    pub doctor_name: String,
    pub reason: String,
    #[serde(default)]
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, BatchStatus::Critical; "zero units is critical")]
    #[test_case(1, BatchStatus::Low; "one unit is low")]
    #[test_case(3, BatchStatus::Low; "three units is low")]
    #[test_case(5, BatchStatus::Low; "boundary five is low")]
    #[test_case(6, BatchStatus::Stable; "boundary six is stable")]
    #[test_case(12, BatchStatus::Stable; "twelve units is stable")]
    #[test_case(19, BatchStatus::Stable; "boundary nineteen is stable")]
    #[test_case(20, BatchStatus::High; "boundary twenty is high")]
    #[test_case(25, BatchStatus::High; "twentyfive units is high")]
    fn test_status_from_units(units: u32, expected: BatchStatus) {
        assert_eq!(BatchStatus::from_units(units), expected);
    }

    #[test]
    fn test_blood_type_round_trip() {
        for bt in BloodType::ALL {
            let parsed: BloodType = bt.as_str().parse().unwrap();
            assert_eq!(parsed, bt);
        }
    }

    #[test]
    fn test_blood_type_unknown_fails() {
        assert!("C+".parse::<BloodType>().is_err());
        assert!("".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_batch_serializes_with_legacy_field_names() {
        let batch = BloodBatch::new(
            BloodType::OPositive,
            45,
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
        );
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["type"], "O+");
        assert_eq!(json["units"], 45);
        assert_eq!(json["status"], "High");
        assert_eq!(json["expiryDate"], "2024-03-12");
    }

    #[test]
    fn test_batch_deserializes_with_missing_status() {
        let json = serde_json::json!({
            "type": "B+",
            "units": 10,
            "expiryDate": "2024-03-10",
            "id": "ignored-extra-field"
        });
        let batch: BloodBatch = serde_json::from_value(json).unwrap();
        assert_eq!(batch.blood_type, BloodType::BPositive);
        assert_eq!(batch.status, BatchStatus::Stable);
    }

    #[test]
    fn test_request_defaults_to_pending() {
        let json = serde_json::json!({
            "bloodType": "A-",
            "units": 2,
            "patientName": "Jane Roe",
            "doctorName": "Dr. Smith",
            "reason": "surgery"
        });
        let request: BloodRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.urgency, Urgency::Normal);
    }
}
