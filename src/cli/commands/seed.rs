//! Seed command implementation
//!
//! This module implements the `seed` command, which creates the first admin
//! account and a small starter blood inventory so a fresh deployment has
//! something to sign in to and look at.

use crate::adapters::auth::{AuthProvider, LocalAuthProvider};
use crate::adapters::store::create_record_store;
use crate::config::load_config;
use crate::config::secret::secret_string;
use crate::core::bloodbank::BloodBankService;
use crate::domain::blood::{BloodBatch, BloodType};
use crate::domain::errors::{AuthError, WardError};
use crate::domain::session::{Role, Session};
use chrono::{Duration, Utc};
use clap::Args;

/// Starter inventory: (type, units), expiring about a month out
const STARTER_BATCHES: [(BloodType, u32); 3] = [
    (BloodType::ONegative, 2),
    (BloodType::BPositive, 10),
    (BloodType::OPositive, 45),
];

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Email for the admin account
    #[arg(long, default_value = "admin@ward.local")]
    pub admin_email: String,

    /// Display name for the admin account
    #[arg(long, default_value = "Administrator")]
    pub admin_name: String,

    /// Password for the admin account
    #[arg(long, env = "WARD_SEED_PASSWORD")]
    pub admin_password: String,

    /// Skip the starter blood inventory
    #[arg(long)]
    pub no_inventory: bool,
}

impl SeedArgs {
    /// Execute the seed command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(admin_email = %self.admin_email, "Seeding initial data");

        println!("🌱 Seeding Ward");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if config.application.dry_run {
            println!("Dry run mode: nothing will be written.");
            println!();
            println!("Would create:");
            println!("  Admin account: {}", self.admin_email);
            if !self.no_inventory {
                for (blood_type, units) in STARTER_BATCHES {
                    println!("  Blood batch: {blood_type} x {units}");
                }
            }
            return Ok(0);
        }

        let store = match create_record_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to record store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if let Err(e) = store.ensure_schema().await {
            println!("❌ Failed to initialize store schema");
            println!("   Error: {e}");
            return Ok(4); // Connection error exit code
        }

        // Admin account
        let auth = LocalAuthProvider::new(store.clone(), config.auth.clone());
        let password = secret_string(self.admin_password.clone());
        match auth
            .create_account(&self.admin_email, &password, &self.admin_name)
            .await
        {
            Ok(uid) => {
                println!("✅ Admin account created: {} ({uid})", self.admin_email);
            }
            Err(WardError::Auth(AuthError::EmailInUse(_))) => {
                println!("ℹ️  Admin account already exists: {}", self.admin_email);
            }
            Err(e) => {
                println!("❌ Failed to create admin account");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        }

        // Starter inventory
        if !self.no_inventory {
            let session = Session::new(
                "seed",
                self.admin_email.clone(),
                self.admin_name.clone(),
                true,
                Role::Admin,
            );
            let blood_bank = BloodBankService::new(store);
            let expiry = (Utc::now() + Duration::days(30)).date_naive();

            for (blood_type, units) in STARTER_BATCHES {
                let batch = BloodBatch::new(blood_type, units, expiry);
                if let Err(e) = blood_bank.add_batch(&session, batch).await {
                    println!("❌ Failed to add starter batch {blood_type}");
                    println!("   Error: {e}");
                    return Ok(5); // Fatal error exit code
                }
                println!("✅ Blood batch added: {blood_type} x {units}");
            }
        }

        println!();
        println!("Seeding complete.");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_args_defaults() {
        let args = SeedArgs {
            admin_email: "admin@ward.local".to_string(),
            admin_name: "Administrator".to_string(),
            admin_password: "changeme".to_string(),
            no_inventory: false,
        };

        assert_eq!(args.admin_email, "admin@ward.local");
        assert!(!args.no_inventory);
    }

    #[test]
    fn test_starter_batches_cover_three_types() {
        let types: Vec<BloodType> = STARTER_BATCHES.iter().map(|(t, _)| *t).collect();
        let mut deduped = types.clone();
        deduped.dedup();
        assert_eq!(types.len(), deduped.len());
    }
}
