//! Authentication provider trait
//!
//! The authentication collaborator: account creation, sign-in for a bearer
//! token, and bearer verification. Role resolution lives in
//! [`resolve_role`], which consults the staff directory.

use crate::adapters::store::traits::RecordStore;
use crate::config::secret::SecretString;
use crate::domain::records::StaffMember;
use crate::domain::session::Role;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A verified caller identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    /// Display name, falling back to the local part of the email
    pub name: String,
    pub email_verified: bool,
}

/// Opaque bearer token returned by sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authentication collaborator
///
/// Verifies bearer credentials and manages accounts. Implementations own
/// token issuance; callers treat tokens as opaque.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account, returning its new uid
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the details
    /// fail validation.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<String>;

    /// Exchange email and password for a bearer token
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<BearerToken>;

    /// Verify a bearer token, returning the caller identity
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or revoked.
    async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser>;

    /// Revoke a bearer token; revoking an unknown token succeeds
    async fn sign_out(&self, token: &str) -> Result<()>;
}

/// Resolve a caller's role from the staff directory
///
/// Scans the `staff` collection for a member whose contact email matches;
/// the member's category maps onto the role. Accounts with no staff entry
/// default to Admin.
pub async fn resolve_role(store: &dyn RecordStore, email: &str) -> Result<Role> {
    let staff = store.get_collection("staff").await?;

    for value in staff.values() {
        let Ok(member) = serde_json::from_value::<StaffMember>(value.clone()) else {
            continue;
        };
        if member.contact.email.eq_ignore_ascii_case(email) {
            let role = Role::from(member.category);
            tracing::debug!(email, ?role, "Resolved role from staff directory");
            return Ok(role);
        }
    }

    tracing::debug!(email, "No staff entry, defaulting to admin role");
    Ok(Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_role_defaults_to_admin() {
        let store = MemoryStore::new();
        let role = resolve_role(&store, "nobody@example.com").await.unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn test_resolve_role_from_staff_entry() {
        let store = MemoryStore::new();
        store
            .create_record(
                "staff",
                json!({
                    "name": "Tess Ortiz",
                    "department": "Laboratory",
                    "category": "technician",
                    "contact": {"phone": "555-0100", "email": "tess@ward.local"},
                    "joiningDate": "2023-02-01"
                }),
            )
            .await
            .unwrap();

        let role = resolve_role(&store, "TESS@ward.local").await.unwrap();
        assert_eq!(role, Role::Technician);
    }
}
