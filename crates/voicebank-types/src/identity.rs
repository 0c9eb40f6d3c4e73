//! Identity types for VoiceBank
//!
//! Callers and sessions are keyed by identifiers handed to us by the
//! telephony transport (call SIDs, provisioned user ids), so the key types
//! wrap strings rather than UUIDs. Transactions are minted internally and
//! keep a UUID. Newtypes prevent accidental mixing of the two worlds.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate externally keyed id types with common implementations
macro_rules! define_key_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an externally supplied key
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the raw key
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_key_type!(UserId, "Unique identifier for a bank customer");
define_key_type!(SessionId, "Unique identifier for one ongoing call (the session key)");
define_key_type!(AccountId, "Unique identifier for a bank account");

/// Unique identifier for a ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_roundtrip() {
        let id = SessionId::new("CA1234");
        assert_eq!(id.as_str(), "CA1234");
        assert_eq!(id.to_string(), "CA1234");
        assert_eq!(id, SessionId::from("CA1234"));
    }

    #[test]
    fn test_transaction_id_prefix() {
        let id = TransactionId::new();
        assert!(id.to_string().starts_with("tx_"));
    }

    #[test]
    fn test_transaction_id_equality() {
        let uuid = Uuid::new_v4();
        assert_eq!(
            TransactionId::from_uuid(uuid),
            TransactionId::from_uuid(uuid)
        );
    }
}
