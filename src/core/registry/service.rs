//! Entity registry service
//!
//! CRUD over the administrative collections, with display-ID allocation on
//! create. Each entity kind keeps its legacy ID field name so records written
//! by earlier deployments and new ones read the same way.

use crate::adapters::auth::provider::AuthProvider;
use crate::adapters::store::traits::RecordStore;
use crate::config::secret::SecretString;
use crate::core::bloodbank::BloodBankService;
use crate::core::idgen::next_display_id;
use crate::domain::ids::IdPrefix;
use crate::domain::records::{
    Appointment, AppointmentStatus, Expense, LabTest, LabTestStatus, Patient, StaffMember,
};
use crate::domain::session::Session;
use crate::domain::{RecordKey, Result, WardError};
use chrono::{Datelike, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const PATIENTS_COLLECTION: &str = "patients";
pub const APPOINTMENTS_COLLECTION: &str = "appointments";
pub const LAB_TESTS_COLLECTION: &str = "labTests";
pub const STAFF_COLLECTION: &str = "staff";
pub const EXPENSES_COLLECTION: &str = "expenses";

/// An entity together with its store key and allocated display ID
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub key: RecordKey,
    pub display_id: Option<String>,
    pub entity: T,
}

/// Aggregate counts for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub patients: usize,
    pub appointments: usize,
    pub lab_tests: usize,
    pub staff: usize,
    pub blood_units: u32,
}

/// Expense aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseStats {
    pub total: f64,
    pub this_month: f64,
    pub transactions: usize,
}

/// Registry over the administrative collections
pub struct RegistryService {
    store: Arc<dyn RecordStore>,
}

impl RegistryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create an entity record with a freshly allocated display ID
    ///
    /// The ID is scanned from a snapshot taken just before the write, so two
    /// concurrent creators can collide on the same number. Single-writer
    /// deployments never see this.
    async fn create_with_display_id<T: Serialize>(
        &self,
        collection: &str,
        prefix: IdPrefix,
        id_field: &str,
        entity: &T,
    ) -> Result<(RecordKey, String)> {
        let snapshot = self.store.get_collection(collection).await?;
        let display_id = next_display_id(prefix, &snapshot);

        let mut data = match serde_json::to_value(entity)? {
            Value::Object(map) => map,
            other => {
                return Err(WardError::Validation(format!(
                    "Entity must serialize to a JSON object, got {other}"
                )))
            }
        };
        data.insert(id_field.to_string(), Value::String(display_id.clone()));

        let key = self
            .store
            .create_record(collection, Value::Object(data))
            .await?;
        Ok((key, display_id))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        id_field: &str,
    ) -> Result<Vec<Stored<T>>> {
        let snapshot = self.store.get_collection(collection).await?;
        let mut out = Vec::with_capacity(snapshot.len());
        for (key, value) in snapshot {
            let display_id = value
                .get(id_field)
                .and_then(Value::as_str)
                .map(str::to_string);
            let entity: T = serde_json::from_value(value)?;
            out.push(Stored {
                key,
                display_id,
                entity,
            });
        }
        Ok(out)
    }

    fn to_patch<T: Serialize>(entity: &T) -> Result<Map<String, Value>> {
        match serde_json::to_value(entity)? {
            Value::Object(map) => Ok(map),
            other => Err(WardError::Validation(format!(
                "Entity must serialize to a JSON object, got {other}"
            ))),
        }
    }

    // Patients

    pub async fn add_patient(&self, session: &Session, patient: &Patient) -> Result<Stored<Patient>> {
        let (key, display_id) = self
            .create_with_display_id(PATIENTS_COLLECTION, IdPrefix::Patient, "patientId", patient)
            .await?;
        tracing::info!(user = %session.email, id = %display_id, "Patient registered");
        Ok(Stored {
            key,
            display_id: Some(display_id),
            entity: patient.clone(),
        })
    }

    pub async fn patients(&self) -> Result<Vec<Stored<Patient>>> {
        self.list(PATIENTS_COLLECTION, "patientId").await
    }

    pub async fn update_patient(&self, key: &RecordKey, patient: &Patient) -> Result<()> {
        self.store
            .update_record(PATIENTS_COLLECTION, key, Self::to_patch(patient)?)
            .await
    }

    pub async fn delete_patient(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(PATIENTS_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Patient deleted");
        Ok(())
    }

    // Appointments

    pub async fn add_appointment(
        &self,
        session: &Session,
        appointment: &Appointment,
    ) -> Result<Stored<Appointment>> {
        let (key, display_id) = self
            .create_with_display_id(
                APPOINTMENTS_COLLECTION,
                IdPrefix::Appointment,
                "appointmentId",
                appointment,
            )
            .await?;
        tracing::info!(user = %session.email, id = %display_id, "Appointment booked");
        Ok(Stored {
            key,
            display_id: Some(display_id),
            entity: appointment.clone(),
        })
    }

    pub async fn appointments(&self) -> Result<Vec<Stored<Appointment>>> {
        self.list(APPOINTMENTS_COLLECTION, "appointmentId").await
    }

    pub async fn update_appointment(&self, key: &RecordKey, appointment: &Appointment) -> Result<()> {
        self.store
            .update_record(APPOINTMENTS_COLLECTION, key, Self::to_patch(appointment)?)
            .await
    }

    /// Move an appointment to a new status, enforcing the lifecycle
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the transition is not allowed from the
    /// appointment's current status.
    pub async fn transition_appointment(
        &self,
        session: &Session,
        key: &RecordKey,
        next: AppointmentStatus,
    ) -> Result<()> {
        let value = self.store.get_record(APPOINTMENTS_COLLECTION, key).await?;
        let appointment: Appointment = serde_json::from_value(value)?;

        if !appointment.status.can_transition_to(next) {
            return Err(WardError::Validation(format!(
                "Cannot move appointment from {} to {next}",
                appointment.status
            )));
        }

        let mut updates = Map::new();
        updates.insert("status".to_string(), serde_json::to_value(next)?);
        self.store
            .update_record(APPOINTMENTS_COLLECTION, key, updates)
            .await?;

        tracing::info!(
            user = %session.email,
            key = %key,
            from = %appointment.status,
            to = %next,
            "Appointment status changed"
        );
        Ok(())
    }

    pub async fn delete_appointment(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(APPOINTMENTS_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Appointment deleted");
        Ok(())
    }

    // Lab tests

    pub async fn add_lab_test(&self, session: &Session, test: &LabTest) -> Result<Stored<LabTest>> {
        let (key, display_id) = self
            .create_with_display_id(LAB_TESTS_COLLECTION, IdPrefix::LabTest, "testId", test)
            .await?;
        tracing::info!(user = %session.email, id = %display_id, "Lab test ordered");
        Ok(Stored {
            key,
            display_id: Some(display_id),
            entity: test.clone(),
        })
    }

    pub async fn lab_tests(&self) -> Result<Vec<Stored<LabTest>>> {
        self.list(LAB_TESTS_COLLECTION, "testId").await
    }

    pub async fn set_lab_test_status(
        &self,
        session: &Session,
        key: &RecordKey,
        status: LabTestStatus,
    ) -> Result<()> {
        let mut updates = Map::new();
        updates.insert("status".to_string(), serde_json::to_value(status)?);
        self.store
            .update_record(LAB_TESTS_COLLECTION, key, updates)
            .await?;
        tracing::info!(user = %session.email, key = %key, "Lab test status updated");
        Ok(())
    }

    pub async fn delete_lab_test(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(LAB_TESTS_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Lab test deleted");
        Ok(())
    }

    // Staff

    pub async fn add_staff(&self, session: &Session, member: &StaffMember) -> Result<Stored<StaffMember>> {
        let (key, display_id) = self
            .create_with_display_id(STAFF_COLLECTION, IdPrefix::Staff, "staffId", member)
            .await?;
        tracing::info!(user = %session.email, id = %display_id, "Staff member added");
        Ok(Stored {
            key,
            display_id: Some(display_id),
            entity: member.clone(),
        })
    }

    /// Add a staff member and open a sign-in account for them in one step
    ///
    /// The account uses the member's contact email. If account creation
    /// fails, the staff record is not written.
    pub async fn add_staff_with_account(
        &self,
        session: &Session,
        auth: &dyn AuthProvider,
        member: &StaffMember,
        password: &SecretString,
    ) -> Result<Stored<StaffMember>> {
        if member.contact.email.trim().is_empty() {
            return Err(WardError::Validation(
                "Staff member needs a contact email to open an account".to_string(),
            ));
        }

        auth.create_account(&member.contact.email, password, &member.name)
            .await?;
        self.add_staff(session, member).await
    }

    pub async fn staff(&self) -> Result<Vec<Stored<StaffMember>>> {
        self.list(STAFF_COLLECTION, "staffId").await
    }

    pub async fn update_staff(&self, key: &RecordKey, member: &StaffMember) -> Result<()> {
        self.store
            .update_record(STAFF_COLLECTION, key, Self::to_patch(member)?)
            .await
    }

    pub async fn delete_staff(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(STAFF_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Staff member deleted");
        Ok(())
    }

    // Expenses

    pub async fn add_expense(&self, session: &Session, expense: &Expense) -> Result<Stored<Expense>> {
        if expense.amount <= 0.0 {
            return Err(WardError::Validation(
                "Expense amount must be positive".to_string(),
            ));
        }
        let (key, display_id) = self
            .create_with_display_id(EXPENSES_COLLECTION, IdPrefix::Expense, "expenseId", expense)
            .await?;
        tracing::info!(user = %session.email, id = %display_id, amount = expense.amount, "Expense recorded");
        Ok(Stored {
            key,
            display_id: Some(display_id),
            entity: expense.clone(),
        })
    }

    pub async fn expenses(&self) -> Result<Vec<Stored<Expense>>> {
        self.list(EXPENSES_COLLECTION, "expenseId").await
    }

    pub async fn delete_expense(&self, session: &Session, key: &RecordKey) -> Result<()> {
        self.store.delete_record(EXPENSES_COLLECTION, key).await?;
        tracing::info!(user = %session.email, key = %key, "Expense deleted");
        Ok(())
    }

    /// Totals across all expenses, plus the current calendar month's share
    pub async fn expense_stats(&self) -> Result<ExpenseStats> {
        let expenses = self.expenses().await?;
        let now = Utc::now().date_naive();

        let total: f64 = expenses.iter().map(|e| e.entity.amount).sum();
        let this_month: f64 = expenses
            .iter()
            .filter(|e| e.entity.date.year() == now.year() && e.entity.date.month() == now.month())
            .map(|e| e.entity.amount)
            .sum();

        Ok(ExpenseStats {
            total,
            this_month,
            transactions: expenses.len(),
        })
    }

    /// Counts shown on the dashboard
    pub async fn dashboard_stats(&self, blood_bank: &BloodBankService) -> Result<DashboardStats> {
        Ok(DashboardStats {
            patients: self.store.get_collection(PATIENTS_COLLECTION).await?.len(),
            appointments: self
                .store
                .get_collection(APPOINTMENTS_COLLECTION)
                .await?
                .len(),
            lab_tests: self.store.get_collection(LAB_TESTS_COLLECTION).await?.len(),
            staff: self.store.get_collection(STAFF_COLLECTION).await?.len(),
            blood_units: blood_bank.total_units().await?,
        })
    }
}
