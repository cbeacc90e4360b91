//! Deduction planning over an inventory snapshot
//!
//! Planning is pure: it looks at a snapshot and produces the per-batch draws
//! that would satisfy a request, without touching the store. Applying the
//! plan is the service's job.

use crate::domain::blood::{BatchStatus, BloodBatch, BloodType};
use crate::domain::{RecordKey, Result, WardError};
use serde_json::Value;
use std::collections::BTreeMap;

/// One step of a deduction plan: take `take` units from the batch at `key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub key: RecordKey,
    pub take: u32,
    /// Units the batch will hold after this draw
    pub remaining_units: u32,
}

/// A consolidated inventory row: one blood type, summed across batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTotal {
    pub blood_type: BloodType,
    pub units: u32,
    pub status: BatchStatus,
}

/// Decode the batches in a snapshot, keeping creation order
///
/// Records that don't parse as batches are skipped rather than failing the
/// whole snapshot; legacy collections carry the odd malformed row.
pub fn decode_batches(snapshot: &BTreeMap<RecordKey, Value>) -> Vec<(RecordKey, BloodBatch)> {
    snapshot
        .iter()
        .filter_map(|(key, value)| {
            match serde_json::from_value::<BloodBatch>(value.clone()) {
                Ok(batch) => Some((key.clone(), batch)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable blood batch");
                    None
                }
            }
        })
        .collect()
}

/// Sum batches into one row per blood type, in first-appearance order
///
/// Types whose total is zero are dropped. Each row's status is derived from
/// the type's total, not from any individual batch.
pub fn consolidate(batches: &[(RecordKey, BloodBatch)]) -> Vec<TypeTotal> {
    let mut order: Vec<BloodType> = Vec::new();
    let mut totals: std::collections::HashMap<BloodType, u32> = std::collections::HashMap::new();

    for (_, batch) in batches {
        if !totals.contains_key(&batch.blood_type) {
            order.push(batch.blood_type);
        }
        *totals.entry(batch.blood_type).or_insert(0) += batch.units;
    }

    order
        .into_iter()
        .filter_map(|blood_type| {
            let units = totals[&blood_type];
            (units > 0).then(|| TypeTotal {
                blood_type,
                units,
                status: BatchStatus::from_units(units),
            })
        })
        .collect()
}

/// Plan a greedy deduction of `requested` units of `blood_type`
///
/// Batches are visited in creation order; each contributes everything it has
/// until the request is covered. Batches already at zero are passed over.
///
/// # Errors
///
/// - `Validation` if `requested` is zero
/// - `UnknownBloodType` if no batch of that type exists at all
/// - `InsufficientUnits` if the type's total is short of the request
pub fn plan_deduction(
    batches: &[(RecordKey, BloodBatch)],
    blood_type: BloodType,
    requested: u32,
) -> Result<Vec<Draw>> {
    if requested == 0 {
        return Err(WardError::Validation(
            "Requested units must be greater than zero".to_string(),
        ));
    }

    let matching: Vec<&(RecordKey, BloodBatch)> = batches
        .iter()
        .filter(|(_, b)| b.blood_type == blood_type)
        .collect();

    if matching.is_empty() {
        return Err(WardError::UnknownBloodType(blood_type.to_string()));
    }

    let available: u32 = matching.iter().map(|(_, b)| b.units).sum();
    if available < requested {
        return Err(WardError::InsufficientUnits {
            blood_type: blood_type.to_string(),
            available,
            requested,
        });
    }

    let mut remaining = requested;
    let mut draws = Vec::new();
    for (key, batch) in matching {
        if remaining == 0 {
            break;
        }
        let take = batch.units.min(remaining);
        if take == 0 {
            continue;
        }
        remaining -= take;
        draws.push(Draw {
            key: key.clone(),
            take,
            remaining_units: batch.units - take,
        });
    }

    Ok(draws)
}
