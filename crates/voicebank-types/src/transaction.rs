//! Transaction records
//!
//! One record per executed transfer, append-only. The dialogue core reads
//! these for "show my last transfers" and for "same amount as last time".

use crate::{Amount, TransactionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An executed outgoing transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub sender: UserId,
    pub recipient_name: String,
    pub recipient_iban: String,
    pub title: String,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// One-sentence spoken description of this transfer
    pub fn spoken(&self) -> String {
        format!(
            "{} to {}, {}",
            self.amount, self.recipient_name, self.title
        )
    }
}
