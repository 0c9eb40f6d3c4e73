//! VoiceBank Ledger - accounts, transfers, history, contacts
//!
//! The ledger is:
//! - Account-keyed by UserId (one current account per customer)
//! - Append-only (executed transfers are immutable records)
//! - Validation-first (every failure is an explicit domain error)
//! - Thread-safe and designed for concurrent access across sessions
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Every executed transfer appends exactly one transaction record
//! 3. Domain-error messages are complete spoken sentences - the dialogue
//!    core surfaces them verbatim as the assistant's reply

pub mod seed;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use voicebank_types::{Account, Amount, Contact, Transaction, TransactionId, User, UserId};

/// Errors that can occur in ledger operations
///
/// Messages double as the spoken reply, so they are phrased for speech.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No account was found for this user.")]
    AccountNotFound,

    #[error("The transfer amount must be positive.")]
    NonPositiveAmount,

    #[error("There are insufficient funds on the account.")]
    InsufficientFunds,

    #[error("The recipient's name is missing.")]
    MissingRecipientName,

    #[error("The recipient's account number is missing.")]
    MissingRecipientAccount,
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The VoiceBank ledger
///
/// An in-memory bank backing the dialogue core. Clonable handle; all
/// clones share state.
#[derive(Clone, Default)]
pub struct Bank {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
    /// All executed transfers (append-only)
    transactions: Arc<RwLock<Vec<Transaction>>>,
    contacts: Arc<RwLock<Vec<Contact>>>,
}

impl Bank {
    /// Create a new empty in-memory bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer
    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Open an account for a customer
    pub async fn add_account(&self, account: Account) {
        self.accounts
            .write()
            .await
            .insert(account.user_id.clone(), account);
    }

    /// Save a contact in a customer's directory
    pub async fn add_contact(&self, contact: Contact) {
        self.contacts.write().await.push(contact);
    }

    /// Look up a customer
    pub async fn get_user(&self, user_id: &UserId) -> Option<User> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Look up a customer's account
    pub async fn get_account(&self, user_id: &UserId) -> Option<Account> {
        self.accounts.read().await.get(user_id).cloned()
    }

    /// Execute a transfer and record it
    ///
    /// Validates before any mutation; on success debits the balance and
    /// appends the transaction, returning the updated account.
    pub async fn transfer(
        &self,
        user_id: &UserId,
        amount: Amount,
        recipient_name: &str,
        recipient_iban: &str,
        title: &str,
    ) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        let mut transactions = self.transactions.write().await;

        let account = accounts
            .get_mut(user_id)
            .ok_or(LedgerError::AccountNotFound)?;

        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        if recipient_name.trim().is_empty() {
            return Err(LedgerError::MissingRecipientName);
        }
        if recipient_iban.trim().is_empty() {
            return Err(LedgerError::MissingRecipientAccount);
        }

        if account.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        account.balance = account
            .balance
            .checked_sub(amount)
            .map_err(|_| LedgerError::InsufficientFunds)?;

        let tx = Transaction {
            id: TransactionId::new(),
            sender: user_id.clone(),
            recipient_name: recipient_name.to_string(),
            recipient_iban: recipient_iban.to_string(),
            title: title.to_string(),
            amount,
            created_at: Utc::now(),
        };
        tracing::info!(sender = %user_id, amount = %amount, recipient = recipient_name, "transfer executed");
        transactions.push(tx);

        Ok(account.clone())
    }

    /// Most recent transfers where the user is the sender, newest first
    pub async fn history(&self, user_id: &UserId, limit: usize) -> Vec<Transaction> {
        let transactions = self.transactions.read().await;
        transactions
            .iter()
            .rev()
            .filter(|t| &t.sender == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// The most recent transfer to a given recipient, if any
    pub async fn last_transfer_to(
        &self,
        user_id: &UserId,
        recipient_name: &str,
    ) -> Option<Transaction> {
        let transactions = self.transactions.read().await;
        transactions
            .iter()
            .rev()
            .find(|t| &t.sender == user_id && t.recipient_name.eq_ignore_ascii_case(recipient_name))
            .cloned()
    }

    /// Resolve a spoken label against the customer's contact directory
    ///
    /// Matching is normalized (lowercase, trimmed): nickname exact, then
    /// full-name exact, then containment either way ("my mom" -> "mom").
    pub async fn resolve_contact(&self, user_id: &UserId, label: &str) -> Option<Contact> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        let contacts = self.contacts.read().await;
        let owned: Vec<&Contact> = contacts.iter().filter(|c| &c.user_id == user_id).collect();

        for c in &owned {
            if c.nickname.to_lowercase() == label {
                return Some((*c).clone());
            }
        }
        for c in &owned {
            if c.full_name.to_lowercase() == label {
                return Some((*c).clone());
            }
        }
        for c in &owned {
            let nickname = c.nickname.to_lowercase();
            if label.contains(&nickname) || nickname.contains(&label) {
                return Some((*c).clone());
            }
        }
        for c in &owned {
            let full_name = c.full_name.to_lowercase();
            if label.contains(&full_name) || full_name.contains(&label) {
                return Some((*c).clone());
            }
        }
        None
    }

    /// Total number of recorded transfers (all senders)
    pub async fn transaction_count(&self) -> usize {
        self.transactions.read().await.len()
    }

    /// Whether any customer is registered (seed guard)
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicebank_types::{AccountId, Currency};

    fn pln(major: i64) -> Amount {
        Amount::from_major(major, Currency::PLN)
    }

    async fn bank_with_account(balance: i64) -> (Bank, UserId) {
        let bank = Bank::new();
        let user_id = UserId::new("user-1");
        bank.add_user(User {
            id: user_id.clone(),
            name: "John Smith".to_string(),
            national_id: "12345678901".to_string(),
            pin: "4321".to_string(),
            phone: "+48123123123".to_string(),
        })
        .await;
        bank.add_account(Account {
            id: AccountId::new("acc-1"),
            user_id: user_id.clone(),
            iban: "PL61109010140000071219812874".to_string(),
            balance: pln(balance),
        })
        .await;
        (bank, user_id)
    }

    #[tokio::test]
    async fn test_transfer_debits_and_records() {
        let (bank, user) = bank_with_account(1000).await;

        let account = bank
            .transfer(&user, pln(400), "Barbara Smith", "PL27114020040000300201355387", "Transfer for mom")
            .await
            .unwrap();

        assert_eq!(account.balance, pln(600));
        assert_eq!(bank.transaction_count().await, 1);

        let history = bank.history(&user, 10).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].recipient_name, "Barbara Smith");
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_state_untouched() {
        let (bank, user) = bank_with_account(100).await;

        let result = bank
            .transfer(&user, pln(200), "Barbara Smith", "PL27114020040000300201355387", "Transfer")
            .await;

        assert_eq!(result, Err(LedgerError::InsufficientFunds));
        assert_eq!(bank.get_account(&user).await.unwrap().balance, pln(100));
        assert_eq!(bank.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_transfer_validations() {
        let (bank, user) = bank_with_account(100).await;

        assert_eq!(
            bank.transfer(&user, pln(0), "Barbara", "PL27", "t").await,
            Err(LedgerError::NonPositiveAmount)
        );
        assert_eq!(
            bank.transfer(&user, pln(10), "", "PL27", "t").await,
            Err(LedgerError::MissingRecipientName)
        );
        assert_eq!(
            bank.transfer(&user, pln(10), "Barbara", "  ", "t").await,
            Err(LedgerError::MissingRecipientAccount)
        );
        assert_eq!(
            bank.transfer(&UserId::new("ghost"), pln(10), "Barbara", "PL27", "t")
                .await,
            Err(LedgerError::AccountNotFound)
        );
    }

    #[tokio::test]
    async fn test_history_newest_first_with_limit() {
        let (bank, user) = bank_with_account(1000).await;
        for (i, name) in ["First", "Second", "Third"].iter().enumerate() {
            bank.transfer(&user, pln(10 + i as i64), name, "PL27", "t")
                .await
                .unwrap();
        }

        let history = bank.history(&user, 2).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].recipient_name, "Third");
        assert_eq!(history[1].recipient_name, "Second");
    }

    #[tokio::test]
    async fn test_last_transfer_to_recipient() {
        let (bank, user) = bank_with_account(1000).await;
        bank.transfer(&user, pln(700), "Green Housing Cooperative", "PL34", "Apartment rent")
            .await
            .unwrap();
        bank.transfer(&user, pln(50), "Michael Nowak", "PL12", "Gift")
            .await
            .unwrap();

        let last = bank
            .last_transfer_to(&user, "green housing cooperative")
            .await
            .unwrap();
        assert_eq!(last.amount, pln(700));

        assert!(bank.last_transfer_to(&user, "Nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_contact_matching() {
        let (bank, user) = bank_with_account(1000).await;
        bank.add_contact(Contact {
            user_id: user.clone(),
            nickname: "mom".to_string(),
            full_name: "Barbara Smith".to_string(),
            iban: "PL27114020040000300201355387".to_string(),
            default_title: "Transfer for mom".to_string(),
        })
        .await;

        assert!(bank.resolve_contact(&user, "mom").await.is_some());
        assert!(bank.resolve_contact(&user, "MOM").await.is_some());
        assert!(bank.resolve_contact(&user, "my mom").await.is_some());
        assert!(bank.resolve_contact(&user, "Barbara Smith").await.is_some());
        assert!(bank.resolve_contact(&user, "the plumber").await.is_none());
        assert!(bank.resolve_contact(&user, "").await.is_none());
        assert!(bank
            .resolve_contact(&UserId::new("someone-else"), "mom")
            .await
            .is_none());
    }
}
