//! Domain identifier types
//!
//! Newtype wrappers for the two identifier kinds Ward deals with: the opaque
//! store-assigned [`RecordKey`] and the fixed per-entity [`IdPrefix`] used to
//! build human-readable display IDs (`P-01`, `LT-14`, ...).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque record key assigned by the store
///
/// Keys are time-prefixed so that lexicographic order equals creation order;
/// a collection snapshot therefore iterates records in the order they were
/// inserted, which the blood-bank deduction loop relies on.
///
/// # Examples
///
/// ```
/// use ward::domain::ids::RecordKey;
///
/// let a = RecordKey::generate();
/// let b = RecordKey::generate();
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey(String);

// Tie-breaker for keys generated within the same millisecond.
static KEY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

const KEY_SUFFIX_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

impl RecordKey {
    /// Creates a RecordKey from an existing string
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or whitespace-only.
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Record key cannot be empty".to_string());
        }
        Ok(Self(key))
    }

    /// Generates a fresh creation-ordered key
    ///
    /// Layout: 12 hex digits of epoch milliseconds, a 4-hex-digit process
    /// sequence, and a 6-character random suffix.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let seq = KEY_SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xffff;

        let mut rng = rand::thread_rng();
        let suffix: String = (0..6)
            .map(|_| {
                let idx = rng.gen_range(0..KEY_SUFFIX_CHARS.len());
                KEY_SUFFIX_CHARS[idx] as char
            })
            .collect();

        Self(format!("{millis:012x}{seq:04x}{suffix}"))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Display-ID prefix, fixed per entity kind
///
/// Prefixes are never reused across kinds. The numeric part of a display ID
/// is allocated by [`crate::core::idgen::next_display_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdPrefix {
    /// Patients (`P-..`)
    Patient,
    /// Appointments (`A-..`)
    Appointment,
    /// Lab tests (`LT-..`)
    LabTest,
    /// Staff members (`ST-..`)
    Staff,
    /// Blood bank batches (`BB-..`)
    BloodBank,
    /// Accounts (`ACC-..`)
    Account,
    /// Settings (`SET-..`)
    Setting,
    /// Expenses (`EX-..`)
    Expense,
}

impl IdPrefix {
    /// Returns the prefix string used in display IDs
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Patient => "P",
            IdPrefix::Appointment => "A",
            IdPrefix::LabTest => "LT",
            IdPrefix::Staff => "ST",
            IdPrefix::BloodBank => "BB",
            IdPrefix::Account => "ACC",
            IdPrefix::Setting => "SET",
            IdPrefix::Expense => "EX",
        }
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
