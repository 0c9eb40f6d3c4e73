//! Error types for the foundation crate

use thiserror::Error;

/// Result type for foundation operations
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors arising from domain-type arithmetic
#[derive(Debug, Clone, Error)]
pub enum TypesError {
    /// Amount overflow during arithmetic
    #[error("Amount overflow during arithmetic operation")]
    AmountOverflow,

    /// Amount underflow during arithmetic
    #[error("Amount underflow during arithmetic operation")]
    AmountUnderflow,

    /// Currency mismatch
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}
