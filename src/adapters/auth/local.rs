//! Local authentication provider
//!
//! Accounts live in the `users` collection of the record store. Passwords
//! are stored as `salt$hash` where both halves are base64 and the hash is
//! SHA-256 over salt bytes followed by the password bytes. Bearer tokens are
//! random 32-byte values held in an in-process table, so they do not survive
//! a restart.

use crate::adapters::auth::provider::{AuthenticatedUser, AuthProvider, BearerToken};
use crate::adapters::store::traits::RecordStore;
use crate::config::schema::AuthConfig;
use crate::config::secret::SecretString;
use crate::domain::errors::{AuthError, StoreError, WardError};
use crate::domain::ids::RecordKey;
use crate::domain::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const USERS_COLLECTION: &str = "users";
const SALT_LEN: usize = 16;
const TOKEN_LEN: usize = 32;

/// Stored shape of a user record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    uid: String,
    email: String,
    display_name: String,
    password_hash: String,
    #[serde(default)]
    email_verified: bool,
}

/// Record-store-backed authentication provider
pub struct LocalAuthProvider {
    store: Arc<dyn RecordStore>,
    config: AuthConfig,
    /// bearer token -> uid
    sessions: RwLock<HashMap<String, String>>,
}

impl LocalAuthProvider {
    pub fn new(store: Arc<dyn RecordStore>, config: AuthConfig) -> Self {
        Self {
            store,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn hash_password(password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest_with_salt(&salt, password);
        format!("{}${}", BASE64.encode(salt), BASE64.encode(digest))
    }

    fn verify_password(stored: &str, password: &str) -> bool {
        let Some((salt_b64, hash_b64)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(hash_b64)) else {
            return false;
        };
        Self::digest_with_salt(&salt, password) == expected
    }

    fn digest_with_salt(salt: &[u8], password: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    }

    fn issue_token() -> String {
        let mut bytes = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        BASE64.encode(bytes)
    }

    fn validate_account(&self, email: &str, password: &SecretString) -> Result<()> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidAccount("Invalid email address".to_string()).into());
        }
        if password.expose_secret().len() < self.config.min_password_length {
            return Err(AuthError::InvalidAccount(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            ))
            .into());
        }
        Ok(())
    }

    /// Find a user record by email, along with its store key
    async fn find_user(&self, email: &str) -> Result<Option<(RecordKey, UserRecord)>> {
        let users = self.store.get_collection(USERS_COLLECTION).await?;
        for (key, value) in users {
            let user: UserRecord = serde_json::from_value(value)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?;
            if user.email.eq_ignore_ascii_case(email) {
                return Ok(Some((key, user)));
            }
        }
        Ok(None)
    }

    async fn find_user_by_uid(&self, uid: &str) -> Result<Option<UserRecord>> {
        let users = self.store.get_collection(USERS_COLLECTION).await?;
        for value in users.into_values() {
            let user: UserRecord = serde_json::from_value(value)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?;
            if user.uid == uid {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<String> {
        self.validate_account(email, password)?;

        if self.find_user(email).await?.is_some() {
            return Err(AuthError::EmailInUse(email.to_string()).into());
        }

        let name = if display_name.trim().is_empty() {
            email.split('@').next().unwrap_or(email).to_string()
        } else {
            display_name.to_string()
        };

        let uid = Uuid::new_v4().to_string();
        let record = UserRecord {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: name,
            password_hash: Self::hash_password(password.expose_secret().as_ref()),
            email_verified: false,
        };

        let data = serde_json::to_value(&record)
            .map_err(|e| WardError::Serialization(e.to_string()))?;
        self.store.create_record(USERS_COLLECTION, data).await?;

        tracing::info!(email, uid = %uid, "Account created");
        Ok(uid)
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<BearerToken> {
        let Some((_, user)) = self.find_user(email).await? else {
            return Err(AuthError::AccountNotFound.into());
        };

        if !Self::verify_password(&user.password_hash, password.expose_secret().as_ref()) {
            return Err(AuthError::IncorrectPassword.into());
        }

        let token = Self::issue_token();
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.uid.clone());

        tracing::info!(email, uid = %user.uid, "Sign-in successful");
        Ok(BearerToken(token))
    }

    async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        let uid = {
            let sessions = self.sessions.read().await;
            sessions.get(token).cloned()
        };
        let Some(uid) = uid else {
            return Err(AuthError::InvalidToken.into());
        };

        let Some(user) = self.find_user_by_uid(&uid).await? else {
            // Account deleted after the token was issued.
            return Err(AuthError::InvalidToken.into());
        };

        Ok(AuthenticatedUser {
            uid: user.uid,
            email: user.email,
            name: user.display_name,
            email_verified: user.email_verified,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::config::secret::secret_string;

    fn provider() -> LocalAuthProvider {
        LocalAuthProvider::new(Arc::new(MemoryStore::new()), AuthConfig::default())
    }

    #[test]
    fn test_password_hash_round_trip() {
        let stored = LocalAuthProvider::hash_password("hunter22");
        assert!(stored.contains('$'));
        assert!(LocalAuthProvider::verify_password(&stored, "hunter22"));
        assert!(!LocalAuthProvider::verify_password(&stored, "hunter23"));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = LocalAuthProvider::hash_password("same-password");
        let b = LocalAuthProvider::hash_password("same-password");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_account_and_sign_in() {
        let auth = provider();
        let uid = auth
            .create_account("kim@ward.local", &secret_string("letmein"), "Kim Vo")
            .await
            .unwrap();
        assert!(!uid.is_empty());

        let token = auth
            .sign_in("kim@ward.local", &secret_string("letmein"))
            .await
            .unwrap();
        let user = auth.verify_token(token.as_str()).await.unwrap();
        assert_eq!(user.uid, uid);
        assert_eq!(user.email, "kim@ward.local");
        assert_eq!(user.name, "Kim Vo");
        assert!(!user.email_verified);
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_email_prefix() {
        let auth = provider();
        auth.create_account("pat@ward.local", &secret_string("letmein"), "")
            .await
            .unwrap();
        let token = auth
            .sign_in("pat@ward.local", &secret_string("letmein"))
            .await
            .unwrap();
        let user = auth.verify_token(token.as_str()).await.unwrap();
        assert_eq!(user.name, "pat");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let auth = provider();
        auth.create_account("dup@ward.local", &secret_string("letmein"), "First")
            .await
            .unwrap();
        let err = auth
            .create_account("dup@ward.local", &secret_string("letmein"), "Second")
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::Auth(AuthError::EmailInUse(_))));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let auth = provider();
        let err = auth
            .create_account("short@ward.local", &secret_string("abc"), "Shorty")
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::Auth(AuthError::InvalidAccount(_))));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email() {
        let auth = provider();
        let err = auth
            .sign_in("ghost@ward.local", &secret_string("whatever"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication error: No account found with this email"
        );
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let auth = provider();
        auth.create_account("ana@ward.local", &secret_string("correct-horse"), "Ana")
            .await
            .unwrap();
        let err = auth
            .sign_in("ana@ward.local", &secret_string("wrong-horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::Auth(AuthError::IncorrectPassword)));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let auth = provider();
        auth.create_account("lee@ward.local", &secret_string("letmein"), "Lee")
            .await
            .unwrap();
        let token = auth
            .sign_in("lee@ward.local", &secret_string("letmein"))
            .await
            .unwrap();

        auth.sign_out(token.as_str()).await.unwrap();
        let err = auth.verify_token(token.as_str()).await.unwrap_err();
        assert!(matches!(err, WardError::Auth(AuthError::InvalidToken)));

        // Revoking again is a no-op.
        auth.sign_out(token.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_token_is_missing() {
        let auth = provider();
        let err = auth.verify_token("").await.unwrap_err();
        assert!(matches!(err, WardError::Auth(AuthError::MissingToken)));
    }
}
