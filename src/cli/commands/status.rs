//! Status command implementation
//!
//! This module implements the `status` command for displaying record counts
//! and the consolidated blood inventory.

use crate::adapters::store::create_record_store;
use crate::config::load_config;
use crate::core::bloodbank::BloodBankService;
use crate::core::registry::RegistryService;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show the blood inventory
    #[arg(long)]
    pub blood_only: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking status");

        println!("📊 Ward Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let store = match create_record_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to record store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if let Err(e) = store.test_connection().await {
            println!("❌ Record store connection test failed");
            println!("   Error: {e}");
            return Ok(4); // Connection error exit code
        }

        let blood_bank = BloodBankService::new(store.clone());

        if !self.blood_only {
            let registry = RegistryService::new(store.clone());
            let stats = match registry.dashboard_stats(&blood_bank).await {
                Ok(s) => s,
                Err(e) => {
                    println!("❌ Failed to load record counts");
                    println!("   Error: {e}");
                    return Ok(5); // Fatal error exit code
                }
            };

            println!("Record counts:");
            println!("  Patients:     {}", stats.patients);
            println!("  Appointments: {}", stats.appointments);
            println!("  Lab tests:    {}", stats.lab_tests);
            println!("  Staff:        {}", stats.staff);
            println!("  Blood units:  {}", stats.blood_units);
            println!();
        }

        let inventory = match blood_bank.consolidated().await {
            Ok(rows) => rows,
            Err(e) => {
                println!("❌ Failed to load blood inventory");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if inventory.is_empty() {
            println!("Blood inventory is empty.");
            println!("Run 'ward seed' to create starter inventory.");
            return Ok(0);
        }

        println!("Blood inventory ({} type(s)):", inventory.len());
        println!();
        println!("{:<12} {:<10} {:<10}", "Blood Type", "Units", "Status");
        println!("{}", "-".repeat(34));
        for row in inventory {
            println!(
                "{:<12} {:<10} {:<10}",
                row.blood_type.as_str(),
                row.units,
                row.status.as_str()
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs { blood_only: false };
        assert!(!args.blood_only);
    }
}
