//! VoiceBank Types - Canonical domain types
//!
//! Foundation crate with zero dependencies on other voicebank crates.
//! Everything that crosses a crate boundary lives here:
//!
//! - Strongly typed identifiers (callers, sessions, accounts, transactions)
//! - Fixed-point money with currency-aware arithmetic
//! - Domain records (users, accounts, contacts, transactions)
//! - Turn roles for dialogue context
//!
//! # Invariants
//!
//! 1. Identifiers of different kinds never mix (newtype per kind)
//! 2. Money arithmetic across currencies is an error, never a coercion
//! 3. Verification secrets (national id, PIN) are never logged or serialized

pub mod account;
pub mod amount;
pub mod contact;
pub mod currency;
pub mod error;
pub mod identity;
pub mod transaction;
pub mod turn;

pub use account::{Account, User};
pub use amount::Amount;
pub use contact::Contact;
pub use currency::Currency;
pub use error::{Result, TypesError};
pub use identity::{AccountId, SessionId, TransactionId, UserId};
pub use transaction::Transaction;
pub use turn::{TurnEntry, TurnRole};
