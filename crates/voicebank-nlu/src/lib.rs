//! VoiceBank NLU - Natural-language understanding capability
//!
//! Turns caller utterances into a small closed vocabulary the dialogue core
//! can branch on deterministically:
//!
//! - Topic intent: transfer / balance / history / other
//! - Dialog act: confirm / reject / end-call / none
//! - Recipient phrase extraction and "same amount as last time" detection
//! - A general-purpose spoken answer for out-of-domain questions
//!
//! ## Key Design Principles
//!
//! 1. Language models may **classify** utterances, NEVER move money
//! 2. All model outputs are normalized to the closed vocabulary
//! 3. Every operation fails closed: a provider error degrades to the safe
//!    default (`Other` intent, `None` act), never into the dialogue core

pub mod provider;
pub mod router;
pub mod types;

pub use provider::*;
pub use router::*;
pub use types::*;
