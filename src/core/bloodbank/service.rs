//! Blood bank service
//!
//! Inventory management over the `bloodBank` collection and request
//! fulfilment into `bloodRequests`. Fulfilment deducts inventory at request
//! time; the request record itself stays Pending for a human decision.

use crate::adapters::store::traits::RecordStore;
use crate::core::bloodbank::deduction::{
    consolidate, decode_batches, plan_deduction, Draw, TypeTotal,
};
use crate::domain::blood::{BatchStatus, BloodBatch, BloodRequest, BloodType};
use crate::domain::session::Session;
use crate::domain::{RecordKey, Result, WardError};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const BLOOD_BANK_COLLECTION: &str = "bloodBank";
pub const BLOOD_REQUESTS_COLLECTION: &str = "bloodRequests";

/// Blood bank operations
pub struct BloodBankService {
    store: Arc<dyn RecordStore>,
}

impl BloodBankService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Add a batch to inventory, deriving its status from the unit count
    pub async fn add_batch(&self, session: &Session, batch: BloodBatch) -> Result<RecordKey> {
        let batch = BloodBatch::new(batch.blood_type, batch.units, batch.expiry_date);
        let data = serde_json::to_value(&batch)?;
        let key = self.store.create_record(BLOOD_BANK_COLLECTION, data).await?;

        tracing::info!(
            user = %session.email,
            blood_type = %batch.blood_type,
            units = batch.units,
            key = %key,
            "Blood batch added"
        );
        Ok(key)
    }

    /// All batches in creation order
    pub async fn inventory(&self) -> Result<Vec<(RecordKey, BloodBatch)>> {
        let snapshot = self.store.get_collection(BLOOD_BANK_COLLECTION).await?;
        Ok(decode_batches(&snapshot))
    }

    /// One row per blood type, summed across batches
    pub async fn consolidated(&self) -> Result<Vec<TypeTotal>> {
        Ok(consolidate(&self.inventory().await?))
    }

    /// Sum of all units across all batches and types
    pub async fn total_units(&self) -> Result<u32> {
        Ok(self.inventory().await?.iter().map(|(_, b)| b.units).sum())
    }

    /// Set a batch's unit count, re-deriving its status
    pub async fn set_batch_units(
        &self,
        session: &Session,
        key: &RecordKey,
        units: u32,
    ) -> Result<()> {
        let mut updates = Map::new();
        updates.insert("units".to_string(), Value::from(units));
        updates.insert(
            "status".to_string(),
            serde_json::to_value(BatchStatus::from_units(units))?,
        );
        self.store
            .update_record(BLOOD_BANK_COLLECTION, key, updates)
            .await?;

        tracing::info!(user = %session.email, key = %key, units, "Batch units updated");
        Ok(())
    }

    /// Remove a batch from inventory
    pub async fn delete_batch(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(BLOOD_BANK_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Blood batch deleted");
        Ok(())
    }

    /// All recorded requests in creation order
    pub async fn requests(&self) -> Result<Vec<(RecordKey, BloodRequest)>> {
        let snapshot = self.store.get_collection(BLOOD_REQUESTS_COLLECTION).await?;
        let mut out = Vec::with_capacity(snapshot.len());
        for (key, value) in snapshot {
            let request: BloodRequest = serde_json::from_value(value)?;
            out.push((key, request));
        }
        Ok(out)
    }

    /// Fulfil a blood request: record it and deduct the units from inventory
    ///
    /// The request is checked against a snapshot, recorded as Pending, and
    /// then the planned draws are applied batch by batch. The record is
    /// written before any deduction and there is no transaction tying the
    /// steps together, so a crash mid-way can leave the request
    /// recorded with a partial deduction. A failed draw is logged and
    /// propagated, never silently retried.
    ///
    /// # Errors
    ///
    /// - `UnknownBloodType` if no batch of the requested type exists
    /// - `InsufficientUnits` if the type's total is short of the request
    /// - `Validation` if the request asks for zero units
    pub async fn request_blood(
        &self,
        session: &Session,
        request: BloodRequest,
    ) -> Result<RecordKey> {
        let batches = self.inventory().await?;
        let draws = plan_deduction(&batches, request.blood_type, request.units)?;

        let request_key = self
            .store
            .create_record(BLOOD_REQUESTS_COLLECTION, serde_json::to_value(&request)?)
            .await?;

        tracing::info!(
            user = %session.email,
            blood_type = %request.blood_type,
            units = request.units,
            patient = %request.patient_name,
            request_key = %request_key,
            "Blood request recorded, deducting inventory"
        );

        if let Err(e) = self.apply_draws(&draws).await {
            tracing::warn!(
                request_key = %request_key,
                error = %e,
                "Deduction failed part-way; inventory may be partially drawn"
            );
            return Err(e);
        }

        Ok(request_key)
    }

    async fn apply_draws(&self, draws: &[Draw]) -> Result<()> {
        for draw in draws {
            let mut updates = Map::new();
            updates.insert("units".to_string(), Value::from(draw.remaining_units));
            updates.insert(
                "status".to_string(),
                serde_json::to_value(BatchStatus::from_units(draw.remaining_units))?,
            );
            self.store
                .update_record(BLOOD_BANK_COLLECTION, &draw.key, updates)
                .await?;
        }
        Ok(())
    }

    /// Availability check without mutating anything
    pub async fn available_units(&self, blood_type: BloodType) -> Result<u32> {
        Ok(self
            .inventory()
            .await?
            .iter()
            .filter(|(_, b)| b.blood_type == blood_type)
            .map(|(_, b)| b.units)
            .sum())
    }

    /// Validate that a request body is well-formed before fulfilment
    pub fn validate_request(request: &BloodRequest) -> Result<()> {
        if request.patient_name.trim().is_empty() {
            return Err(WardError::Validation(
                "Patient name is required".to_string(),
            ));
        }
        if request.units == 0 {
            return Err(WardError::Validation(
                "Requested units must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::blood::{RequestStatus, Urgency};
    use crate::domain::session::Role;
    use chrono::NaiveDate;

    fn session() -> Session {
        Session::new("uid-1", "admin@ward.local", "Admin", true, Role::Admin)
    }

    fn service() -> BloodBankService {
        BloodBankService::new(Arc::new(MemoryStore::new()))
    }

    fn batch(blood_type: BloodType, units: u32) -> BloodBatch {
        BloodBatch::new(
            blood_type,
            units,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn request(blood_type: BloodType, units: u32) -> BloodRequest {
        BloodRequest {
            blood_type,
            units,
            urgency: Urgency::Urgent,
            patient_name: "Jane Roe".to_string(),
            doctor_name: "Dr. Smith".to_string(),
            reason: "surgery".to_string(),
            status: RequestStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_request_deducts_across_batches_in_order() {
        let svc = service();
        let s = session();
        svc.add_batch(&s, batch(BloodType::OPositive, 3)).await.unwrap();
        svc.add_batch(&s, batch(BloodType::OPositive, 4)).await.unwrap();

        svc.request_blood(&s, request(BloodType::OPositive, 5))
            .await
            .unwrap();

        let inventory = svc.inventory().await.unwrap();
        let units: Vec<u32> = inventory.iter().map(|(_, b)| b.units).collect();
        assert_eq!(units, vec![0, 2]);

        let statuses: Vec<BatchStatus> = inventory.iter().map(|(_, b)| b.status).collect();
        assert_eq!(statuses, vec![BatchStatus::Critical, BatchStatus::Low]);
    }

    #[tokio::test]
    async fn test_request_recorded_as_pending() {
        let svc = service();
        let s = session();
        svc.add_batch(&s, batch(BloodType::BPositive, 10)).await.unwrap();

        svc.request_blood(&s, request(BloodType::BPositive, 2))
            .await
            .unwrap();

        let requests = svc.requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1.status, RequestStatus::Pending);
        assert_eq!(requests[0].1.units, 2);
    }

    #[tokio::test]
    async fn test_over_request_leaves_inventory_unchanged() {
        let svc = service();
        let s = session();
        svc.add_batch(&s, batch(BloodType::OPositive, 3)).await.unwrap();
        svc.add_batch(&s, batch(BloodType::OPositive, 4)).await.unwrap();

        let err = svc
            .request_blood(&s, request(BloodType::OPositive, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::InsufficientUnits { .. }));

        let units: Vec<u32> = svc
            .inventory()
            .await
            .unwrap()
            .iter()
            .map(|(_, b)| b.units)
            .collect();
        assert_eq!(units, vec![3, 4]);
        assert!(svc.requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_absent_type_leaves_inventory_unchanged() {
        let svc = service();
        let s = session();
        svc.add_batch(&s, batch(BloodType::OPositive, 8)).await.unwrap();

        let err = svc
            .request_blood(&s, request(BloodType::AbNegative, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::UnknownBloodType(_)));

        assert_eq!(svc.total_units().await.unwrap(), 8);
        assert!(svc.requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consolidated_sums_per_type() {
        let svc = service();
        let s = session();
        svc.add_batch(&s, batch(BloodType::BPositive, 10)).await.unwrap();
        svc.add_batch(&s, batch(BloodType::OPositive, 3)).await.unwrap();
        svc.add_batch(&s, batch(BloodType::BPositive, 12)).await.unwrap();

        let rows = svc.consolidated().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].blood_type, BloodType::BPositive);
        assert_eq!(rows[0].units, 22);
        assert_eq!(rows[1].blood_type, BloodType::OPositive);
        assert_eq!(rows[1].units, 3);
    }

    #[tokio::test]
    async fn test_set_batch_units_rederives_status() {
        let svc = service();
        let s = session();
        let key = svc.add_batch(&s, batch(BloodType::ANegative, 2)).await.unwrap();

        svc.set_batch_units(&s, &key, 25).await.unwrap();

        let inventory = svc.inventory().await.unwrap();
        assert_eq!(inventory[0].1.units, 25);
        assert_eq!(inventory[0].1.status, BatchStatus::High);
    }

    #[tokio::test]
    async fn test_delete_batch() {
        let svc = service();
        let s = session();
        let key = svc.add_batch(&s, batch(BloodType::ONegative, 2)).await.unwrap();
        svc.delete_batch(&s, &key).await.unwrap();
        assert!(svc.inventory().await.unwrap().is_empty());
    }

    #[test]
    fn test_validate_request_requires_patient_name() {
        let mut r = request(BloodType::OPositive, 1);
        r.patient_name = "  ".to_string();
        assert!(BloodBankService::validate_request(&r).is_err());
    }
}
