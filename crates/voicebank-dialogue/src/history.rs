//! Bounded per-session turn history
//!
//! Append-only log of (speaker, text) pairs used as NLU context and for
//! "same amount as last time" questions. Only the orchestrator appends;
//! capabilities receive read-only snapshots. Authentication turns are never
//! recorded here.

use serde::{Deserialize, Serialize};
use voicebank_types::TurnEntry;

/// Ordered dialogue log bounded to the most recent N exchanges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnHistory {
    entries: Vec<TurnEntry>,
    max_exchanges: usize,
}

impl TurnHistory {
    /// Create an empty history keeping at most `max_exchanges` exchanges
    /// (two entries per exchange)
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_exchanges,
        }
    }

    /// Record one caller utterance and the assistant's reply
    ///
    /// Oldest entries are dropped first; order is preserved.
    pub fn record_exchange(&mut self, caller: impl Into<String>, assistant: impl Into<String>) {
        self.entries.push(TurnEntry::caller(caller));
        self.entries.push(TurnEntry::assistant(assistant));

        let cap = self.max_exchanges * 2;
        if self.entries.len() > cap {
            let excess = self.entries.len() - cap;
            self.entries.drain(..excess);
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> &[TurnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything (call start / session reset)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
