//! Dialogue turn roles
//!
//! Shared between the dialogue core (which owns the bounded history) and the
//! NLU capability (which receives recent turns as classification context).

use serde::{Deserialize, Serialize};

/// Who produced a line of dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Caller,
    Assistant,
}

/// One line of dialogue with its speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEntry {
    pub role: TurnRole,
    pub text: String,
}

impl TurnEntry {
    pub fn caller(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Caller,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}
