//! Authentication state machine
//!
//! Three verification steps in a fixed order - full name, last four digits
//! of the national identification number, PIN - none skippable. Matching is
//! purely local string and digit comparison: verification must not depend
//! on a probabilistic classifier.

use serde::{Deserialize, Serialize};
use voicebank_types::User;

use crate::parse::extract_digits;

/// Verification step a session is currently at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStep {
    NeedName,
    NeedIdSuffix,
    NeedPin,
    Authenticated,
}

/// Per-session authentication state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthState {
    pub step: AuthStep,
    /// Mismatches at the current step; resets on every advance
    pub failed_attempts: u32,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            step: AuthStep::NeedName,
            failed_attempts: 0,
        }
    }

    /// Back to square one - a fresh call must restart from the name step
    pub fn reset(&mut self) {
        self.step = AuthStep::NeedName;
        self.failed_attempts = 0;
    }

    pub fn is_authenticated(&self) -> bool {
        self.step == AuthStep::Authenticated
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the orchestrator should do after an authentication turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// Mismatch within budget - re-prompt and keep listening
    ContinueListening,
    /// Step passed - ask for the next credential
    Advance,
    /// Final step passed - the session is verified
    Authenticated,
    /// Retry budget exhausted - end the call
    HangUp,
}

/// The question to ask for the current step (also the no-input re-prompt)
pub fn step_prompt(step: AuthStep) -> &'static str {
    match step {
        AuthStep::NeedName => "Please say your full name.",
        AuthStep::NeedIdSuffix => {
            "Please say the last four digits of your national identification number."
        }
        AuthStep::NeedPin => "Please say your four digit PIN.",
        AuthStep::Authenticated => "How can I help you?",
    }
}

/// Run one authentication turn against the on-file credentials
pub fn handle(
    state: &mut AuthState,
    user: &User,
    transcript: &str,
    max_attempts: u32,
) -> (String, AuthSignal) {
    match state.step {
        AuthStep::NeedName => {
            if name_matches(&user.name, transcript) {
                state.step = AuthStep::NeedIdSuffix;
                state.failed_attempts = 0;
                (
                    "Thank you. Please say the last four digits of your national identification number."
                        .to_string(),
                    AuthSignal::Advance,
                )
            } else {
                mismatch(
                    state,
                    max_attempts,
                    "I couldn't verify your name. Please repeat your full name.",
                )
            }
        }
        AuthStep::NeedIdSuffix => {
            if digits_match(&extract_digits(transcript), user.national_id_suffix()) {
                state.step = AuthStep::NeedPin;
                state.failed_attempts = 0;
                (
                    "Identification confirmed. Now please say your four digit PIN.".to_string(),
                    AuthSignal::Advance,
                )
            } else {
                mismatch(
                    state,
                    max_attempts,
                    "Those digits do not match our records. Please repeat the last four digits of your identification number.",
                )
            }
        }
        AuthStep::NeedPin => {
            if digits_match(&extract_digits(transcript), &user.pin) {
                state.step = AuthStep::Authenticated;
                state.failed_attempts = 0;
                ("Authentication successful.".to_string(), AuthSignal::Authenticated)
            } else {
                mismatch(
                    state,
                    max_attempts,
                    "The PIN you provided is incorrect. Please repeat your PIN.",
                )
            }
        }
        AuthStep::Authenticated => {
            (step_prompt(AuthStep::Authenticated).to_string(), AuthSignal::Authenticated)
        }
    }
}

fn mismatch(state: &mut AuthState, max_attempts: u32, reprompt: &str) -> (String, AuthSignal) {
    state.failed_attempts += 1;
    if state.failed_attempts >= max_attempts {
        tracing::warn!("authentication retry budget exhausted at {:?}", state.step);
        state.reset();
        (
            "I'm unable to verify your identity. For your security, the call will now end."
                .to_string(),
            AuthSignal::HangUp,
        )
    } else {
        (reprompt.to_string(), AuthSignal::ContinueListening)
    }
}

/// Case- and space-insensitive substring test of the on-file name
fn name_matches(on_file: &str, transcript: &str) -> bool {
    let needle = normalize(on_file);
    !needle.is_empty() && normalize(transcript).contains(&needle)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Exact match, or a longer digit string whose suffix matches
fn digits_match(spoken: &str, expected: &str) -> bool {
    !expected.is_empty()
        && (spoken == expected || (spoken.len() > expected.len() && spoken.ends_with(expected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicebank_types::UserId;

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
    fn test_full_progression() {
        let user = demo_user();
        let mut state = AuthState::new();

        let (reply, signal) = handle(&mut state, &user, "hello, this is john smith", 3);
        assert_eq!(signal, AuthSignal::Advance);
        assert_eq!(state.step, AuthStep::NeedIdSuffix);
        assert!(reply.contains("last four digits"));

        let (_, signal) = handle(&mut state, &user, "eight nine zero one, 8901", 3);
        assert_eq!(signal, AuthSignal::Advance);
        assert_eq!(state.step, AuthStep::NeedPin);

        let (reply, signal) = handle(&mut state, &user, "4321", 3);
        assert_eq!(signal, AuthSignal::Authenticated);
        assert_eq!(state.step, AuthStep::Authenticated);
        assert_eq!(reply, "Authentication successful.");
    }

    #[test]
    fn test_no_step_skipping() {
        let user = demo_user();
        let mut state = AuthState::new();

        // Saying the PIN at the name step does not advance
        let (_, signal) = handle(&mut state, &user, "4321", 3);
        assert_eq!(signal, AuthSignal::ContinueListening);
        assert_eq!(state.step, AuthStep::NeedName);
        assert_eq!(state.failed_attempts, 1);
    }

    #[test]
    fn test_suffix_match_in_longer_digit_string() {
        let user = demo_user();
        let mut state = AuthState::new();
        state.step = AuthStep::NeedIdSuffix;

        // Full national id spoken: suffix still matches
        let (_, signal) = handle(&mut state, &user, "12345678901", 3);
        assert_eq!(signal, AuthSignal::Advance);
    }

    #[test]
    fn test_wrong_suffix_rejected() {
        let user = demo_user();
        let mut state = AuthState::new();
        state.step = AuthStep::NeedIdSuffix;

        let (_, signal) = handle(&mut state, &user, "1234", 3);
        assert_eq!(signal, AuthSignal::ContinueListening);
        assert_eq!(state.step, AuthStep::NeedIdSuffix);
    }

    #[test]
    fn test_budget_exhaustion_resets_to_name_step() {
        let user = demo_user();
        let mut state = AuthState::new();
        state.step = AuthStep::NeedIdSuffix;

        for _ in 0..2 {
            let (_, signal) = handle(&mut state, &user, "0000", 3);
            assert_eq!(signal, AuthSignal::ContinueListening);
        }
        let (reply, signal) = handle(&mut state, &user, "0000", 3);
        assert_eq!(signal, AuthSignal::HangUp);
        assert!(reply.contains("call will now end"));

        // Fully reset: a fresh call starts over at the name step
        assert_eq!(state.step, AuthStep::NeedName);
        assert_eq!(state.failed_attempts, 0);
    }

    #[test]
    fn test_attempts_reset_on_advance() {
        let user = demo_user();
        let mut state = AuthState::new();

        handle(&mut state, &user, "wrong name", 3);
        handle(&mut state, &user, "wrong again", 3);
        assert_eq!(state.failed_attempts, 2);

        let (_, signal) = handle(&mut state, &user, "John Smith", 3);
        assert_eq!(signal, AuthSignal::Advance);
        assert_eq!(state.failed_attempts, 0);
    }

    #[test]
    fn test_distinct_reprompts_per_step() {
        let user = demo_user();

        let mut at_name = AuthState::new();
        let (name_reply, _) = handle(&mut at_name, &user, "mumble", 3);

        let mut at_id = AuthState::new();
        at_id.step = AuthStep::NeedIdSuffix;
        let (id_reply, _) = handle(&mut at_id, &user, "mumble", 3);

        let mut at_pin = AuthState::new();
        at_pin.step = AuthStep::NeedPin;
        let (pin_reply, _) = handle(&mut at_pin, &user, "mumble", 3);

        assert_ne!(name_reply, id_reply);
        assert_ne!(id_reply, pin_reply);
        assert_ne!(name_reply, pin_reply);
    }
}
