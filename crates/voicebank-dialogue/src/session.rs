//! Session store
//!
//! One `Session` per ongoing call, keyed strictly by the call/session
//! identifier handed in by the transport. Many independent sessions run
//! concurrently; turns within one session are sequential (transport
//! guarantee), so the store only needs cross-key safety.
//!
//! Accessors lock one shard briefly and never hold a map reference across
//! an await point.

use dashmap::DashMap;
use voicebank_types::{SessionId, TurnEntry, User, UserId};

use crate::auth::{self, AuthSignal, AuthState};
use crate::config::DialogueConfig;
use crate::confirm::PendingTransfer;
use crate::history::TurnHistory;

/// All state owned by one ongoing call
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub auth: AuthState,
    pub pending: Option<PendingTransfer>,
    pub history: TurnHistory,
}

impl Session {
    pub fn new(user_id: UserId, history_exchanges: usize) -> Self {
        Self {
            user_id,
            auth: AuthState::new(),
            pending: None,
            history: TurnHistory::new(history_exchanges),
        }
    }
}

/// Concurrent map of live sessions
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session for a call if it does not exist yet
    pub fn ensure(&self, session_id: &SessionId, user_id: &UserId, config: &DialogueConfig) {
        self.sessions
            .entry(session_id.clone())
            .or_insert_with(|| Session::new(user_id.clone(), config.history_exchanges));
    }

    /// Discard a session entirely (hangup, end of call)
    pub fn remove(&self, session_id: &SessionId) {
        self.sessions.remove(session_id);
    }

    /// Whether a session exists for this key
    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Reset hook: guarantee no state leaks into a new call reusing a key
    pub fn reset(&self, session_id: &SessionId) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.auth.reset();
            session.pending = None;
            session.history.clear();
        }
    }

    pub fn is_authenticated(&self, session_id: &SessionId) -> bool {
        self.sessions
            .get(session_id)
            .map(|s| s.auth.is_authenticated())
            .unwrap_or(false)
    }

    /// Run one authentication turn inside the session lock
    pub fn handle_auth(
        &self,
        session_id: &SessionId,
        user: &User,
        transcript: &str,
        max_attempts: u32,
    ) -> Option<(String, AuthSignal)> {
        let mut session = self.sessions.get_mut(session_id)?;
        Some(auth::handle(&mut session.auth, user, transcript, max_attempts))
    }

    /// The question to repeat when no speech was captured
    pub fn current_prompt(&self, session_id: &SessionId) -> &'static str {
        match self.sessions.get(session_id) {
            Some(s) => auth::step_prompt(s.auth.step),
            None => auth::step_prompt(crate::auth::AuthStep::NeedName),
        }
    }

    pub fn has_pending(&self, session_id: &SessionId) -> bool {
        self.sessions
            .get(session_id)
            .map(|s| s.pending.is_some())
            .unwrap_or(false)
    }

    /// Take the pending transfer out for a confirmation turn
    pub fn take_pending(&self, session_id: &SessionId) -> Option<PendingTransfer> {
        self.sessions.get_mut(session_id)?.pending.take()
    }

    /// Install (or restore) the pending transfer for a session
    pub fn set_pending(&self, session_id: &SessionId, pending: PendingTransfer) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.pending = Some(pending);
        }
    }

    /// Read-only snapshot of the retained dialogue for NLU context
    pub fn history_snapshot(&self, session_id: &SessionId) -> Vec<TurnEntry> {
        self.sessions
            .get(session_id)
            .map(|s| s.history.entries().to_vec())
            .unwrap_or_default()
    }

    pub fn record_exchange(&self, session_id: &SessionId, caller: &str, assistant: &str) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.history.record_exchange(caller, assistant);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_session() -> (SessionStore, SessionId) {
        let store = SessionStore::new();
        let sid = SessionId::new("CA100");
        store.ensure(&sid, &UserId::new("user-1"), &DialogueConfig::default());
        (store, sid)
    }

    #[test]
    fn test_sessions_are_independent() {
        let (store, sid_a) = store_with_session();
        let sid_b = SessionId::new("CA200");
        store.ensure(&sid_b, &UserId::new("user-2"), &DialogueConfig::default());

        store.record_exchange(&sid_a, "hello", "hi");
        assert_eq!(store.history_snapshot(&sid_a).len(), 2);
        assert!(store.history_snapshot(&sid_b).is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (store, sid) = store_with_session();
        store.record_exchange(&sid, "hello", "hi");
        store.set_pending(
            &sid,
            PendingTransfer {
                amount: voicebank_types::Amount::from_major(10, voicebank_types::Currency::PLN),
                recipient_name: "Barbara".to_string(),
                recipient_iban: "PL27".to_string(),
                title: "t".to_string(),
                stage: crate::confirm::ConfirmStage::AwaitingFirstConfirm,
            },
        );

        store.reset(&sid);
        assert!(store.history_snapshot(&sid).is_empty());
        assert!(!store.has_pending(&sid));
        assert!(!store.is_authenticated(&sid));
    }

    #[test]
    fn test_take_pending_removes_it() {
        let (store, sid) = store_with_session();
        assert!(store.take_pending(&sid).is_none());

        store.set_pending(
            &sid,
            PendingTransfer {
                amount: voicebank_types::Amount::from_major(10, voicebank_types::Currency::PLN),
                recipient_name: "Barbara".to_string(),
                recipient_iban: "PL27".to_string(),
                title: "t".to_string(),
                stage: crate::confirm::ConfirmStage::AwaitingFirstConfirm,
            },
        );
        assert!(store.take_pending(&sid).is_some());
        assert!(!store.has_pending(&sid));
    }
}
