//! Amount type with fixed-point arithmetic
//!
//! Balances and transfer amounts are stored in minor units (grosze, cents)
//! as an i64 to keep ledger arithmetic exact. Floating point exists only at
//! the two spoken-language boundaries: parsing an amount out of a
//! transcript, and formatting a reply.

use crate::{Currency, Result, TypesError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Money in minor units with its currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// Raw value in minor units (e.g. grosze for PLN)
    pub minor: i64,
    /// The currency
    pub currency: Currency,
}

impl Amount {
    /// Create an amount from minor units
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Create an amount from major units (e.g. 50 PLN)
    pub fn from_major(major: i64, currency: Currency) -> Self {
        Self {
            minor: major * Self::multiplier(currency),
            currency,
        }
    }

    /// Create an amount from a human-readable value (e.g. 50.50)
    ///
    /// Rounds to the currency's minor unit.
    pub fn from_human(human: f64, currency: Currency) -> Self {
        let minor = (human * Self::multiplier(currency) as f64).round() as i64;
        Self { minor, currency }
    }

    /// Create a zero amount
    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Get the human-readable value
    pub fn to_human(&self) -> f64 {
        self.minor as f64 / Self::multiplier(self.currency) as f64
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    /// Checked addition (currencies must match)
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.require_same_currency(&other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(TypesError::AmountOverflow)?;
        Ok(Self { minor, ..self })
    }

    /// Checked subtraction (currencies must match)
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.require_same_currency(&other)?;
        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(TypesError::AmountUnderflow)?;
        Ok(Self { minor, ..self })
    }

    fn require_same_currency(&self, other: &Self) -> Result<()> {
        if self.currency != other.currency {
            return Err(TypesError::CurrencyMismatch {
                expected: self.currency.code(),
                actual: other.currency.code(),
            });
        }
        Ok(())
    }

    fn multiplier(currency: Currency) -> i64 {
        10i64.pow(currency.decimals() as u32)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.prec$} {}",
            self.to_human(),
            self.currency,
            prec = self.currency.decimals() as usize
        )
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        self.minor.partial_cmp(&other.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_human_rounds_to_minor_unit() {
        let amt = Amount::from_human(50.50, Currency::PLN);
        assert_eq!(amt.minor, 5050);
        assert_eq!(amt.to_human(), 50.5);
    }

    #[test]
    fn test_display_for_speech() {
        let amt = Amount::from_human(700.0, Currency::PLN);
        assert_eq!(amt.to_string(), "700.00 PLN");
    }

    #[test]
    fn test_checked_sub() {
        let a = Amount::from_major(100, Currency::PLN);
        let b = Amount::from_major(40, Currency::PLN);
        assert_eq!(a.checked_sub(b).unwrap(), Amount::from_major(60, Currency::PLN));
    }

    #[test]
    fn test_currency_mismatch() {
        let a = Amount::from_major(100, Currency::PLN);
        let b = Amount::from_major(100, Currency::USD);
        assert!(a.checked_add(b).is_err());
        assert!(a.partial_cmp(&b).is_none());
    }

    #[test]
    fn test_comparison() {
        let a = Amount::from_major(100, Currency::PLN);
        let b = Amount::from_major(50, Currency::PLN);
        assert!(a > b);
        assert!(b.is_positive());
        assert!(!Amount::zero(Currency::PLN).is_positive());
    }
}
