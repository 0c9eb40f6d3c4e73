//! HTTP handlers
//!
//! Thin protocol adapters: form-in/XML-out for the telephony webhook,
//! JSON-in/JSON-out for text clients. All dialogue decisions happen in the
//! orchestrator.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use voicebank_dialogue::Turn;
use voicebank_types::{SessionId, UserId};

use crate::twiml::VoiceResponse;
use crate::AppState;

/// Path the telephony network posts each spoken turn to
pub const VOICE_WEBHOOK_PATH: &str = "/telephony/voice";

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================================
// Telephony webhook
// ============================================================================

/// Form body posted by the telephony network per spoken turn
#[derive(Debug, Deserialize)]
pub struct VoiceForm {
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
}

pub async fn voice_webhook(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VoiceForm>,
) -> impl IntoResponse {
    let session_id = SessionId::new(
        form.call_sid
            .filter(|sid| !sid.is_empty())
            .unwrap_or_else(|| "call-unknown".to_string()),
    );
    let caller = state.resolve_caller();

    let speech = form
        .speech_result
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    // First contact of a call carries no speech: reset the session so no
    // authentication state leaks from an earlier call on this key, then
    // welcome the caller.
    let response = if speech.is_none() && !state.orchestrator.has_session(&session_id) {
        state.orchestrator.reset_auth(&session_id);
        VoiceResponse::new()
            .gather(
                VOICE_WEBHOOK_PATH,
                "Welcome to the banking assistant. To begin, please say your full name.",
            )
            .say("No speech detected. Goodbye.")
    } else {
        let turn = state
            .orchestrator
            .process_turn(&session_id, &caller, speech)
            .await;
        tracing::info!(session = %session_id, label = %turn.label, end_call = turn.end_call, "turn completed");

        render_turn(&turn)
    };

    (
        [(header::CONTENT_TYPE, "application/xml")],
        response.to_xml(),
    )
}

/// Map a dialogue turn to the webhook response document
///
/// A turn that ends the call is spoken and hung up; any other turn is
/// spoken inside a gather so the caller's next utterance comes back.
fn render_turn(turn: &Turn) -> VoiceResponse {
    if turn.end_call {
        VoiceResponse::new().say(&turn.reply).hangup()
    } else {
        VoiceResponse::new().gather(VOICE_WEBHOOK_PATH, &turn.reply)
    }
}

// ============================================================================
// JSON chat endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: String,
    pub end_call: bool,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let user_id = request
        .user_id
        .map(UserId::new)
        .unwrap_or_else(|| state.resolve_caller());
    let session_id = SessionId::new(
        request
            .session_id
            .unwrap_or_else(|| format!("chat-{}", user_id)),
    );

    let turn = state
        .orchestrator
        .process_turn(&session_id, &user_id, Some(&request.message))
        .await;

    Json(ChatResponse {
        reply: turn.reply,
        intent: turn.label.to_string(),
        end_call: turn.end_call,
    })
}
