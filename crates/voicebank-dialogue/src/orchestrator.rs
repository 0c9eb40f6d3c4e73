//! Dialogue orchestrator - the per-turn entry point
//!
//! Routes a transcript through authentication (if incomplete), then through
//! a pending confirmation (if one exists), then through intent dispatch.
//! Transfers are only ever *proposed* here; execution happens exclusively
//! in the confirmation machine after two explicit confirmations.

use std::fmt;

use voicebank_ledger::Bank;
use voicebank_nlu::{DialogAct, Intent, NluRouter};
use voicebank_types::{Amount, SessionId, TurnEntry, UserId};

use crate::auth::AuthSignal;
use crate::config::DialogueConfig;
use crate::confirm::{self, ConfirmStage, PendingTransfer};
use crate::parse;
use crate::session::SessionStore;

/// Coarse label of what a turn was about, for the transport layer and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnLabel {
    AuthContinue,
    AuthSuccess,
    AuthFailed,
    Confirmation,
    NoInput,
    Intent(Intent),
}

impl fmt::Display for TurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthContinue => write!(f, "auth_continue"),
            Self::AuthSuccess => write!(f, "auth_success"),
            Self::AuthFailed => write!(f, "auth_failed"),
            Self::Confirmation => write!(f, "confirmation"),
            Self::NoInput => write!(f, "no_input"),
            Self::Intent(intent) => write!(f, "{}", intent),
        }
    }
}

/// The outcome of one turn: what to say, what it was, whether to hang up
#[derive(Debug, Clone)]
pub struct Turn {
    pub reply: String,
    pub label: TurnLabel,
    pub end_call: bool,
}

impl Turn {
    fn speak(reply: impl Into<String>, label: TurnLabel) -> Self {
        Self {
            reply: reply.into(),
            label,
            end_call: false,
        }
    }

    fn hangup(reply: impl Into<String>, label: TurnLabel) -> Self {
        Self {
            reply: reply.into(),
            label,
            end_call: true,
        }
    }
}

/// The top-level dialogue engine
///
/// Owns the session store; the NLU router and the bank are shared
/// capability handles.
pub struct Orchestrator {
    sessions: SessionStore,
    bank: Bank,
    nlu: NluRouter,
    config: DialogueConfig,
}

impl Orchestrator {
    pub fn new(bank: Bank, nlu: NluRouter, config: DialogueConfig) -> Self {
        Self {
            sessions: SessionStore::new(),
            bank,
            nlu,
            config,
        }
    }

    /// Reset hook for call start: no state leaks across calls reusing a key
    pub fn reset_auth(&self, session_id: &SessionId) {
        self.sessions.reset(session_id);
    }

    /// Live session count (diagnostics)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any state exists for this session key
    pub fn has_session(&self, session_id: &SessionId) -> bool {
        self.sessions.contains(session_id)
    }

    /// Process one turn of a call
    ///
    /// `transcript == None` (or blank) means no speech was captured this
    /// turn; that is a re-prompt, not an error.
    pub async fn process_turn(
        &self,
        session_id: &SessionId,
        caller: &UserId,
        transcript: Option<&str>,
    ) -> Turn {
        self.sessions.ensure(session_id, caller, &self.config);

        let text = match transcript.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => text,
            None => {
                let prompt = if self.sessions.is_authenticated(session_id) {
                    "I didn't catch that. Could you repeat, please?".to_string()
                } else {
                    format!("I didn't catch that. {}", self.sessions.current_prompt(session_id))
                };
                return Turn::speak(prompt, TurnLabel::NoInput);
            }
        };

        tracing::debug!(session = %session_id, "caller turn received");

        if !self.sessions.is_authenticated(session_id) {
            return self.authentication_turn(session_id, caller, text).await;
        }

        if self.sessions.has_pending(session_id) {
            return self.confirmation_turn(session_id, caller, text).await;
        }

        self.dispatch_turn(session_id, caller, text).await
    }

    async fn authentication_turn(
        &self,
        session_id: &SessionId,
        caller: &UserId,
        text: &str,
    ) -> Turn {
        let Some(user) = self.bank.get_user(caller).await else {
            tracing::warn!(caller = %caller, "unknown caller id");
            self.sessions.remove(session_id);
            return Turn::hangup(
                "I could not find your customer record. For your security, the call will now end.",
                TurnLabel::AuthFailed,
            );
        };

        let Some((reply, signal)) =
            self.sessions
                .handle_auth(session_id, &user, text, self.config.max_auth_attempts)
        else {
            // Session vanished between ensure and now; treat as no input.
            return Turn::speak("I didn't catch that. Please say your full name.", TurnLabel::NoInput);
        };

        match signal {
            AuthSignal::HangUp => {
                self.sessions.remove(session_id);
                Turn::hangup(reply, TurnLabel::AuthFailed)
            }
            AuthSignal::Authenticated => {
                Turn::speak(format!("{} How can I help you today?", reply), TurnLabel::AuthSuccess)
            }
            AuthSignal::Advance | AuthSignal::ContinueListening => {
                Turn::speak(reply, TurnLabel::AuthContinue)
            }
        }
    }

    async fn confirmation_turn(&self, session_id: &SessionId, caller: &UserId, text: &str) -> Turn {
        let history = self.sessions.history_snapshot(session_id);
        let act = self.nlu.dialog_act(text, &history).await;

        let Some(pending) = self.sessions.take_pending(session_id) else {
            return self.dispatch_turn(session_id, caller, text).await;
        };

        let (outcome, keep) = confirm::advance(&self.bank, caller, pending, act).await;
        if let Some(open) = keep {
            self.sessions.set_pending(session_id, open);
        }

        self.sessions.record_exchange(session_id, text, &outcome.reply);
        if outcome.call_continues {
            Turn::speak(outcome.reply, TurnLabel::Confirmation)
        } else {
            self.sessions.remove(session_id);
            Turn::hangup(outcome.reply, TurnLabel::Confirmation)
        }
    }

    async fn dispatch_turn(&self, session_id: &SessionId, caller: &UserId, text: &str) -> Turn {
        let history = self.sessions.history_snapshot(session_id);
        let intent = self.nlu.intent(text, &history).await;
        tracing::debug!(session = %session_id, intent = %intent, "intent dispatched");

        let (reply, end_call) = match intent {
            Intent::MakeTransfer => (
                self.propose_transfer(session_id, caller, text, &history).await,
                false,
            ),
            Intent::CheckBalance => self.balance_reply(caller, text, &history).await,
            Intent::ShowHistory => self.history_reply(caller, text, &history).await,
            Intent::Other => self.fallback_reply(caller, text, &history).await,
        };

        self.sessions.record_exchange(session_id, text, &reply);
        if end_call {
            self.sessions.remove(session_id);
            Turn::hangup(reply, TurnLabel::Intent(intent))
        } else {
            Turn::speak(reply, TurnLabel::Intent(intent))
        }
    }

    /// Resolve recipient and amount, then park the transfer for
    /// confirmation. Never executes anything.
    async fn propose_transfer(
        &self,
        session_id: &SessionId,
        caller: &UserId,
        text: &str,
        history: &[TurnEntry],
    ) -> String {
        let Some(account) = self.bank.get_account(caller).await else {
            return "No account was found for this user.".to_string();
        };

        let Some(label) = self.nlu.recipient(text, history).await else {
            return "I understand you want to make a transfer. Who should receive it?".to_string();
        };

        let Some(contact) = self.bank.resolve_contact(caller, &label).await else {
            return format!(
                "I couldn't find {} among your saved recipients. Who should receive the transfer?",
                label
            );
        };

        let amount = match parse::extract_amount(text) {
            Some(value) => Amount::from_human(value, account.balance.currency),
            None => {
                if self.nlu.same_amount(text, history).await {
                    match self.bank.last_transfer_to(caller, &contact.full_name).await {
                        Some(tx) => tx.amount,
                        None => {
                            return format!(
                                "I couldn't find a previous transfer to {}. How much would you like to send?",
                                contact.full_name
                            );
                        }
                    }
                } else {
                    return format!(
                        "How much would you like to send to {}?",
                        contact.full_name
                    );
                }
            }
        };

        let pending = PendingTransfer {
            amount,
            recipient_name: contact.full_name.clone(),
            recipient_iban: contact.iban.clone(),
            title: contact.default_title.clone(),
            stage: ConfirmStage::AwaitingFirstConfirm,
        };
        let prompt = format!(
            "You want to send {} to {}, title: {}. Is that correct?",
            pending.amount, pending.recipient_name, pending.title
        );
        self.sessions.set_pending(session_id, pending);
        prompt
    }

    async fn balance_reply(
        &self,
        caller: &UserId,
        text: &str,
        history: &[TurnEntry],
    ) -> (String, bool) {
        let reply = match self.bank.get_account(caller).await {
            Some(account) => format!(
                "Your current balance is {} on account {}.",
                account.balance, account.iban
            ),
            None => "No account was found for this user.".to_string(),
        };
        self.maybe_goodbye(reply, text, history).await
    }

    async fn history_reply(
        &self,
        caller: &UserId,
        text: &str,
        history: &[TurnEntry],
    ) -> (String, bool) {
        let limit = parse::extract_history_limit(
            text,
            self.config.default_history_limit,
            self.config.max_history_limit,
        );
        let transfers = self.bank.history(caller, limit).await;

        let reply = if transfers.is_empty() {
            "You have no recent transfers.".to_string()
        } else {
            let lines: Vec<String> = transfers.iter().map(|t| t.spoken()).collect();
            format!(
                "Here are your last {} transfers: {}.",
                transfers.len(),
                lines.join("; ")
            )
        };
        self.maybe_goodbye(reply, text, history).await
    }

    async fn fallback_reply(
        &self,
        caller: &UserId,
        text: &str,
        history: &[TurnEntry],
    ) -> (String, bool) {
        let act = self.nlu.dialog_act(text, history).await;
        if act == DialogAct::EndCall {
            return ("Thank you for calling. Goodbye.".to_string(), true);
        }

        let mut context = String::new();
        if let Some(user) = self.bank.get_user(caller).await {
            context.push_str(&format!("Customer: {}\n", user.name));
        }
        if let Some(account) = self.bank.get_account(caller).await {
            context.push_str(&format!(
                "Balance: {} on account {}\n",
                account.balance, account.iban
            ));
        }

        (self.nlu.answer(text, &context).await, false)
    }

    /// Append a goodbye and end the call when the same utterance also
    /// asked to finish (read-only intents only).
    async fn maybe_goodbye(
        &self,
        reply: String,
        text: &str,
        history: &[TurnEntry],
    ) -> (String, bool) {
        if self.nlu.dialog_act(text, history).await == DialogAct::EndCall {
            (format!("{} Thank you for calling. Goodbye.", reply), true)
        } else {
            (reply, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicebank_nlu::ProviderKind;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Bank::new(),
            NluRouter::from_kind(ProviderKind::Keyword),
            DialogueConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_no_input_is_a_reprompt_not_an_error() {
        let orch = orchestrator();
        let sid = SessionId::new("CA1");
        let user = UserId::new("user-1");

        let turn = orch.process_turn(&sid, &user, None).await;
        assert_eq!(turn.label, TurnLabel::NoInput);
        assert!(!turn.end_call);
        assert!(turn.reply.contains("full name"));

        let turn = orch.process_turn(&sid, &user, Some("   ")).await;
        assert_eq!(turn.label, TurnLabel::NoInput);
    }

    #[tokio::test]
    async fn test_unknown_caller_ends_call() {
        let orch = orchestrator();
        let sid = SessionId::new("CA1");

        let turn = orch
            .process_turn(&sid, &UserId::new("ghost"), Some("hello"))
            .await;
        assert_eq!(turn.label, TurnLabel::AuthFailed);
        assert!(turn.end_call);
    }

    #[tokio::test]
    async fn test_label_wire_strings() {
        assert_eq!(TurnLabel::AuthContinue.to_string(), "auth_continue");
        assert_eq!(
            TurnLabel::Intent(Intent::MakeTransfer).to_string(),
            "make_transfer"
        );
        assert_eq!(TurnLabel::NoInput.to_string(), "no_input");
    }
}
