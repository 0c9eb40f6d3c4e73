//! Customer and account records
//!
//! `User` carries the verification secrets the authentication flow checks
//! against. Serialization skips them so they cannot leak through an API
//! response or a debug dump of session state.

use crate::{AccountId, Amount, UserId};
use serde::{Deserialize, Serialize};

/// A bank customer with on-file verification data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Full legal name, matched against the spoken name during verification
    pub name: String,
    /// National identification number; only the last 4 digits are ever asked for
    #[serde(skip_serializing)]
    pub national_id: String,
    /// Four-digit telephone PIN
    #[serde(skip_serializing)]
    pub pin: String,
    pub phone: String,
}

impl User {
    /// Last four digits of the national identification number
    pub fn national_id_suffix(&self) -> &str {
        let n = self.national_id.len();
        &self.national_id[n.saturating_sub(4)..]
    }
}

/// A current account owned by one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub iban: String,
    pub balance: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn demo_user() -> User {
        User {
            id: UserId::new("user-1"),
            name: "John Smith".to_string(),
            national_id: "12345678901".to_string(),
            pin: "4321".to_string(),
            phone: "+48123123123".to_string(),
        }
    }

    #[test]
    fn test_national_id_suffix() {
        assert_eq!(demo_user().national_id_suffix(), "8901");
    }

    #[test]
    fn test_secrets_not_serialized() {
        let json = serde_json::to_string(&demo_user()).unwrap();
        assert!(!json.contains("4321"));
        assert!(!json.contains("12345678901"));
    }

    #[test]
    fn test_account_balance() {
        let account = Account {
            id: AccountId::new("acc-1"),
            user_id: UserId::new("user-1"),
            iban: "PL61109010140000071219812874".to_string(),
            balance: Amount::from_major(4000, Currency::PLN),
        };
        assert!(account.balance.is_positive());
    }
}
