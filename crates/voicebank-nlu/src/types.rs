//! Common types for NLU interactions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during NLU operations
#[derive(Error, Debug)]
pub enum NluError {
    #[error("Provider not available: {provider}")]
    ProviderNotAvailable { provider: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

pub type Result<T> = std::result::Result<T, NluError>;

/// Topic intent of a caller utterance
///
/// Closed vocabulary: anything a model returns outside it is normalized to
/// `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MakeTransfer,
    CheckBalance,
    ShowHistory,
    Other,
}

impl Intent {
    /// Normalize arbitrary model output to the vocabulary
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "make_transfer" | "transfer" => Self::MakeTransfer,
            "check_balance" | "balance" => Self::CheckBalance,
            "show_history" | "history" => Self::ShowHistory,
            _ => Self::Other,
        }
    }

    /// Wire string for API responses and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MakeTransfer => "make_transfer",
            Self::CheckBalance => "check_balance",
            Self::ShowHistory => "show_history",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse classification of a turn, independent of topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogAct {
    Confirm,
    Reject,
    EndCall,
    None,
}

impl DialogAct {
    /// Normalize arbitrary model output to the vocabulary
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "confirm" | "yes" => Self::Confirm,
            "reject" | "no" => Self::Reject,
            "end_call" | "end" | "goodbye" => Self::EndCall,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::EndCall => "end_call",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for DialogAct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider kind for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Any OpenAI-compatible chat completions API
    OpenAiCompat,
    /// Deterministic keyword matcher (no model)
    Keyword,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai_compat" | "openai-compat" | "openaicompat" => Some(Self::OpenAiCompat),
            "keyword" | "deterministic" | "none" => Some(Self::Keyword),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAiCompat => write!(f, "openai_compat"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_normalization() {
        assert_eq!(Intent::parse("MAKE_TRANSFER"), Intent::MakeTransfer);
        assert_eq!(Intent::parse(" check_balance \n"), Intent::CheckBalance);
        assert_eq!(Intent::parse("show_history"), Intent::ShowHistory);
        assert_eq!(Intent::parse("tell me a joke"), Intent::Other);
        assert_eq!(Intent::parse(""), Intent::Other);
    }

    #[test]
    fn test_dialog_act_normalization() {
        assert_eq!(DialogAct::parse("confirm"), DialogAct::Confirm);
        assert_eq!(DialogAct::parse("END_CALL"), DialogAct::EndCall);
        assert_eq!(DialogAct::parse("maybe?"), DialogAct::None);
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(
            ProviderKind::from_str("openai_compat"),
            Some(ProviderKind::OpenAiCompat)
        );
        assert_eq!(ProviderKind::from_str("keyword"), Some(ProviderKind::Keyword));
        assert_eq!(ProviderKind::from_str("unknown"), None);
    }
}
