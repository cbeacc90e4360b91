//! Sequential display-ID allocation
//!
//! Display IDs look like `P-01`, `LT-14`, `ST-07`: a fixed per-entity prefix,
//! a dash, and a zero-padded sequence number. The next ID for a prefix is
//! max-of-existing plus one, scanned from a snapshot of the entity's
//! collection. Records whose ID doesn't match the prefix simply don't
//! contribute to the maximum.
//!
//! Allocation is read-then-write with no reservation step, so two callers
//! snapshotting concurrently can be handed the same ID. Single-writer
//! deployments never see this; see DESIGN.md for the tradeoff.

use crate::domain::ids::IdPrefix;
use crate::domain::RecordKey;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Record fields that may hold a display ID, checked in order
///
/// Legacy data stored IDs under entity-specific field names before settling
/// on `id`; the first field present on a record wins.
const LEGACY_ID_FIELDS: [&str; 5] = ["testId", "patientId", "appointmentId", "staffId", "id"];

/// Allocate the next display ID for `prefix` given a collection snapshot
///
/// Takes each record's first present ID field, parses it against
/// `<prefix>-<digits>`, and returns `<prefix>-<max+1>` zero-padded to at
/// least two digits. An empty collection (or one with no matching IDs)
/// yields `<prefix>-01`.
pub fn next_display_id(prefix: IdPrefix, records: &BTreeMap<RecordKey, Value>) -> String {
    let pattern = format!(r"{}-(\d+)", regex::escape(prefix.as_str()));
    // The prefix alphabet is fixed, so the pattern always compiles.
    let re = Regex::new(&pattern).expect("valid display-ID pattern");

    let mut max_num: u64 = 0;
    for record in records.values() {
        let Some(id) = LEGACY_ID_FIELDS
            .iter()
            .find_map(|field| record.get(*field).and_then(Value::as_str))
        else {
            continue;
        };
        let Some(captures) = re.captures(id) else {
            continue;
        };
        if let Some(num) = captures.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
            if num > 0 && num > max_num {
                max_num = num;
            }
        }
    }

    format!("{}-{:02}", prefix.as_str(), max_num + 1)
}

/// Next patient ID (`P-..`)
pub fn next_patient_id(records: &BTreeMap<RecordKey, Value>) -> String {
    next_display_id(IdPrefix::Patient, records)
}

/// Next appointment ID (`A-..`)
pub fn next_appointment_id(records: &BTreeMap<RecordKey, Value>) -> String {
    next_display_id(IdPrefix::Appointment, records)
}

/// Next lab test ID (`LT-..`)
pub fn next_lab_test_id(records: &BTreeMap<RecordKey, Value>) -> String {
    next_display_id(IdPrefix::LabTest, records)
}

/// Next staff ID (`ST-..`)
pub fn next_staff_id(records: &BTreeMap<RecordKey, Value>) -> String {
    next_display_id(IdPrefix::Staff, records)
}

/// Next expense ID (`EX-..`)
pub fn next_expense_id(records: &BTreeMap<RecordKey, Value>) -> String {
    next_display_id(IdPrefix::Expense, records)
}
