//! Administrative entity registry

pub mod service;

pub use service::{
    DashboardStats, ExpenseStats, RegistryService, Stored, APPOINTMENTS_COLLECTION,
    EXPENSES_COLLECTION, LAB_TESTS_COLLECTION, PATIENTS_COLLECTION, STAFF_COLLECTION,
};
