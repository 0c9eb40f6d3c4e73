//! Dialogue configuration

/// Tunable limits for the dialogue core
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Authentication mismatches tolerated per step before hanging up
    pub max_auth_attempts: u32,
    /// Caller/assistant exchanges kept as NLU context
    pub history_exchanges: usize,
    /// Transfers listed when the caller does not name a count
    pub default_history_limit: usize,
    /// Hard cap on the number of transfers listed
    pub max_history_limit: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_auth_attempts: 3,
            history_exchanges: 10,
            default_history_limit: 3,
            max_history_limit: 10,
        }
    }
}
