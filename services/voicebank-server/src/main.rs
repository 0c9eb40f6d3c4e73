//! VoiceBank Server - phone banking assistant backend
//!
//! One binary serving:
//! - The telephony webhook (one POST per spoken turn, XML verbs out)
//! - A JSON chat endpoint for text clients
//! - A health endpoint
//!
//! # Quick Start
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8000) and the keyword NLU fallback
//! voicebank-server
//!
//! # Custom port and an OpenAI-compatible NLU endpoint
//! VOICEBANK_NLU_PROVIDER=openai_compat VOICEBANK_NLU_API_KEY=sk-... \
//!     voicebank-server --port 9000
//! ```

mod handlers;
mod twiml;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voicebank_dialogue::{DialogueConfig, Orchestrator};
use voicebank_ledger::{seed::seed_demo_data, Bank};
use voicebank_nlu::NluRouter;
use voicebank_types::UserId;

/// VoiceBank Server - phone banking assistant
#[derive(Parser, Debug)]
#[command(
    name = "voicebank-server",
    about = "VoiceBank - spoken banking dialogue over a telephony webhook",
    version
)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "VOICEBANK_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "VOICEBANK_PORT")]
    port: u16,

    /// Customer id calls are bound to (demo deployment)
    #[arg(long, default_value = "user-1", env = "VOICEBANK_DEMO_USER")]
    demo_user: String,
}

/// Shared application state
pub struct AppState {
    pub orchestrator: Orchestrator,
    demo_user: UserId,
}

impl AppState {
    /// Caller identity for the current turn
    ///
    /// A production deployment would resolve the calling phone number to a
    /// customer record; the demo binds every call to one seeded customer.
    pub fn resolve_caller(&self) -> UserId {
        self.demo_user.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bank = Bank::new();
    seed_demo_data(&bank).await;

    let nlu = NluRouter::from_env();
    tracing::info!("NLU provider: {}", nlu.kind());

    let orchestrator = Orchestrator::new(bank, nlu, DialogueConfig::default());
    let state = Arc::new(AppState {
        orchestrator,
        demo_user: UserId::new(args.demo_user),
    });

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route(handlers::VOICE_WEBHOOK_PATH, post(handlers::voice_webhook))
        .route("/assistant/chat", post(handlers::chat))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
