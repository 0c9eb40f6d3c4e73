//! Saved transfer recipients
//!
//! Contacts let a caller say "send fifty to mom" instead of dictating an
//! IBAN. Each contact carries a default transfer title so the assistant can
//! propose a complete transfer from a single utterance.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A saved recipient in a customer's contact directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub user_id: UserId,
    /// Short spoken label, e.g. "mom", "rent"
    pub nickname: String,
    pub full_name: String,
    pub iban: String,
    /// Title used when the caller does not dictate one
    pub default_title: String,
}
