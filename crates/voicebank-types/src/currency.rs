//! Currency types for VoiceBank

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fiat currency codes (ISO 4217) supported by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    PLN,
    EUR,
    USD,
}

impl Currency {
    /// Get the standard decimal places for this currency
    pub fn decimals(&self) -> u8 {
        2
    }

    /// Get the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::PLN => "PLN",
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }

    /// Parse an ISO 4217 code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PLN" => Some(Self::PLN),
            "EUR" => Some(Self::EUR),
            "USD" => Some(Self::USD),
            _ => None,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::PLN
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!(Currency::parse("pln"), Some(Currency::PLN));
        assert_eq!(Currency::parse("USD"), Some(Currency::USD));
        assert_eq!(Currency::parse("GBP"), None);
    }
}
