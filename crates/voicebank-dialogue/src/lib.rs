//! VoiceBank Dialogue - the session dialogue state machine
//!
//! Decides, turn by turn, what step a caller is in (unauthenticated /
//! authenticating / authenticated-transacting), what must be asked next,
//! when a transfer needs confirmation before execution, and when a call
//! should end.
//!
//! # Invariants
//!
//! 1. At most one pending transfer exists per session
//! 2. No transfer executes while the session is not authenticated
//! 3. A transfer executes only after two explicit confirmations
//! 4. An end-call act while a transfer is pending NEVER executes it
//! 5. Every turn produces a spoken reply and an explicit continue/hangup
//!    signal - capability failures degrade, they never abort a turn

pub mod auth;
pub mod config;
pub mod confirm;
pub mod history;
pub mod orchestrator;
pub mod parse;
pub mod session;

pub use auth::{AuthSignal, AuthState, AuthStep};
pub use config::DialogueConfig;
pub use confirm::{ConfirmOutcome, ConfirmStage, PendingTransfer};
pub use history::TurnHistory;
pub use orchestrator::{Orchestrator, Turn, TurnLabel};
pub use session::{Session, SessionStore};
