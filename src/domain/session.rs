//! Request-scoped session
//!
//! The signed-in user never lives in ambient global state; an explicit
//! [`Session`] value is passed to each service operation instead.

use crate::domain::records::StaffCategory;
use serde::{Deserialize, Serialize};

/// Role assigned to a session at sign-in
///
/// Resolved from the staff directory by email; accounts with no staff entry
/// default to Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Doctor,
    Technician,
    Receptionist,
}

impl From<StaffCategory> for Role {
    fn from(category: StaffCategory) -> Self {
        match category {
            StaffCategory::Doctor => Role::Doctor,
            StaffCategory::Admin => Role::Admin,
            StaffCategory::Technician => Role::Technician,
            StaffCategory::Receptionist => Role::Receptionist,
        }
    }
}

/// An authenticated caller, scoped to a single sequence of operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub email_verified: bool,
    pub role: Role,
}

impl Session {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        email_verified: bool,
        role: Role,
    ) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            name: name.into(),
            email_verified,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_staff_category() {
        assert_eq!(Role::from(StaffCategory::Doctor), Role::Doctor);
        assert_eq!(Role::from(StaffCategory::Admin), Role::Admin);
        assert_eq!(Role::from(StaffCategory::Technician), Role::Technician);
        assert_eq!(Role::from(StaffCategory::Receptionist), Role::Receptionist);
    }

    #[test]
    fn test_default_role_is_admin() {
        assert_eq!(Role::default(), Role::Admin);
    }
}
