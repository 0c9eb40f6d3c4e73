//! Transfer confirmation state machine
//!
//! Two explicit confirmations sit between "the caller asked to transfer"
//! and "the ledger moves money". While a transfer is pending this machine
//! owns every turn until the pending state is resolved.
//!
//! The single most important invariant in the system: an end-call act
//! while a transfer is pending never executes it, regardless of stage.

use serde::{Deserialize, Serialize};
use voicebank_ledger::Bank;
use voicebank_types::{Amount, UserId};

use voicebank_nlu::DialogAct;

/// Confirmation stage of a pending transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmStage {
    AwaitingFirstConfirm,
    AwaitingFinalConfirm,
}

/// A transfer proposed but not yet executed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub amount: Amount,
    pub recipient_name: String,
    pub recipient_iban: String,
    pub title: String,
    pub stage: ConfirmStage,
}

impl PendingTransfer {
    /// One-sentence spoken restatement of the proposal
    pub fn spoken(&self) -> String {
        format!(
            "{} to {}, title: {}",
            self.amount, self.recipient_name, self.title
        )
    }
}

/// Result of one confirmation turn
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub reply: String,
    pub call_continues: bool,
    /// Whether the ledger executed the transfer this turn
    pub executed: bool,
}

/// Run one confirmation turn
///
/// Takes ownership of the pending transfer; returns it only when the
/// proposal is still open (ambiguous input, or first confirmation given).
/// `None` means the pending state is resolved - executed, rejected, or
/// abandoned.
pub async fn advance(
    bank: &Bank,
    user_id: &UserId,
    mut pending: PendingTransfer,
    act: DialogAct,
) -> (ConfirmOutcome, Option<PendingTransfer>) {
    match act {
        DialogAct::EndCall => {
            // Hard safety path: drop the proposal, never call the ledger.
            tracing::info!(user = %user_id, "pending transfer abandoned on end-call");
            (
                ConfirmOutcome {
                    reply: "Understood, the transfer will not be made. Thank you for calling. Goodbye."
                        .to_string(),
                    call_continues: false,
                    executed: false,
                },
                None,
            )
        }
        DialogAct::Reject => (
            ConfirmOutcome {
                reply: "All right, I have cancelled the transfer. Is there anything else I can help you with?"
                    .to_string(),
                call_continues: true,
                executed: false,
            },
            None,
        ),
        DialogAct::Confirm => match pending.stage {
            ConfirmStage::AwaitingFirstConfirm => {
                pending.stage = ConfirmStage::AwaitingFinalConfirm;
                let reply = format!(
                    "To be sure: {}. Shall I send it? Please say yes to execute the transfer.",
                    pending.spoken()
                );
                (
                    ConfirmOutcome {
                        reply,
                        call_continues: true,
                        executed: false,
                    },
                    Some(pending),
                )
            }
            ConfirmStage::AwaitingFinalConfirm => {
                match bank
                    .transfer(
                        user_id,
                        pending.amount,
                        &pending.recipient_name,
                        &pending.recipient_iban,
                        &pending.title,
                    )
                    .await
                {
                    Ok(account) => (
                        ConfirmOutcome {
                            reply: format!(
                                "The transfer of {} to {} was completed. Your new balance is {}. Can I help you with anything else?",
                                pending.amount, pending.recipient_name, account.balance
                            ),
                            call_continues: true,
                            executed: true,
                        },
                        None,
                    ),
                    // Domain error: spoken verbatim, proposal discarded -
                    // a rejected transfer is never silently retried.
                    Err(e) => (
                        ConfirmOutcome {
                            reply: e.to_string(),
                            call_continues: true,
                            executed: false,
                        },
                        None,
                    ),
                }
            }
        },
        DialogAct::None => {
            let reply = format!(
                "I need an explicit answer. {} - yes or no?",
                pending.spoken()
            );
            (
                ConfirmOutcome {
                    reply,
                    call_continues: true,
                    executed: false,
                },
                Some(pending),
            )
        }
    }
}
