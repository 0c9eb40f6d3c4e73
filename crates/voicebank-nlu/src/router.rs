//! NLU Router - selects a provider and fails closed
//!
//! The dialogue core talks to the router, never to a provider directly. The
//! router's methods are infallible: any provider error is logged and
//! degraded to the safe default, so a flaky model endpoint can never abort
//! a turn or leave the call without a reply.

use std::sync::Arc;

use voicebank_types::TurnEntry;

use crate::provider::*;
use crate::types::*;

/// Selects and wraps an NLU provider
#[derive(Clone)]
pub struct NluRouter {
    provider: Arc<dyn NluProvider>,
    kind: ProviderKind,
}

impl NluRouter {
    /// Create a router with a specific provider
    pub fn new(provider: Arc<dyn NluProvider>) -> Self {
        let kind = provider.kind();
        Self { provider, kind }
    }

    /// Create a router from environment variables
    ///
    /// Reads `VOICEBANK_NLU_PROVIDER` to select the provider:
    /// - `openai_compat` (default): any OpenAI-compatible endpoint,
    ///   configured via `VOICEBANK_NLU_BASE_URL` / `_API_KEY` / `_MODEL`
    /// - `keyword`: deterministic keyword matcher, no model
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors)
        let _ = dotenvy::dotenv();

        let provider_name = std::env::var("VOICEBANK_NLU_PROVIDER")
            .unwrap_or_else(|_| "openai_compat".to_string());

        let kind = ProviderKind::from_str(&provider_name).unwrap_or(ProviderKind::OpenAiCompat);

        Self::from_kind(kind)
    }

    /// Create a router for a specific provider kind
    pub fn from_kind(kind: ProviderKind) -> Self {
        let provider: Arc<dyn NluProvider> = match kind {
            ProviderKind::OpenAiCompat => {
                if let Some(p) = OpenAiCompatProvider::from_env() {
                    Arc::new(p)
                } else {
                    tracing::warn!("NLU API key not found, using keyword fallback");
                    Arc::new(KeywordProvider::new())
                }
            }
            ProviderKind::Keyword => Arc::new(KeywordProvider::new()),
        };

        Self::new(provider)
    }

    /// Get the provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Topic intent; fails closed to `Other`
    pub async fn intent(&self, text: &str, history: &[TurnEntry]) -> Intent {
        match self.provider.classify_intent(text, history).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!("intent classification failed ({}): {}", self.provider.name(), e);
                Intent::Other
            }
        }
    }

    /// Recipient phrase; fails closed to `None`
    pub async fn recipient(&self, text: &str, history: &[TurnEntry]) -> Option<String> {
        match self.provider.extract_recipient(text, history).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!("recipient extraction failed ({}): {}", self.provider.name(), e);
                None
            }
        }
    }

    /// "Same amount as last time"; fails closed to `false`
    pub async fn same_amount(&self, text: &str, history: &[TurnEntry]) -> bool {
        match self.provider.refers_to_same_amount(text, history).await {
            Ok(same) => same,
            Err(e) => {
                tracing::warn!("same-amount detection failed ({}): {}", self.provider.name(), e);
                false
            }
        }
    }

    /// Dialog act; fails closed to `DialogAct::None`
    pub async fn dialog_act(&self, text: &str, history: &[TurnEntry]) -> DialogAct {
        match self.provider.classify_dialog_act(text, history).await {
            Ok(act) => act,
            Err(e) => {
                tracing::warn!("dialog-act classification failed ({}): {}", self.provider.name(), e);
                DialogAct::None
            }
        }
    }

    /// Open-ended answer; fails closed to a fixed apology
    pub async fn answer(&self, text: &str, context: &str) -> String {
        match self.provider.answer(text, context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("fallback answer failed ({}): {}", self.provider.name(), e);
                "I'm sorry, I can't help with that right now. You can ask about your balance, \
recent transfers, or send money to a saved recipient."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Provider that fails every call, for fail-closed tests
    struct BrokenProvider;

    #[async_trait]
    impl NluProvider for BrokenProvider {
        fn name(&self) -> &'static str {
            "Broken"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAiCompat
        }

        async fn classify_intent(&self, _: &str, _: &[TurnEntry]) -> Result<Intent> {
            Err(NluError::NetworkError {
                message: "connection refused".to_string(),
            })
        }

        async fn extract_recipient(&self, _: &str, _: &[TurnEntry]) -> Result<Option<String>> {
            Err(NluError::NetworkError {
                message: "connection refused".to_string(),
            })
        }

        async fn refers_to_same_amount(&self, _: &str, _: &[TurnEntry]) -> Result<bool> {
            Err(NluError::NetworkError {
                message: "connection refused".to_string(),
            })
        }

        async fn classify_dialog_act(&self, _: &str, _: &[TurnEntry]) -> Result<DialogAct> {
            Err(NluError::NetworkError {
                message: "connection refused".to_string(),
            })
        }

        async fn answer(&self, _: &str, _: &str) -> Result<String> {
            Err(NluError::NetworkError {
                message: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_fails_closed_on_provider_error() {
        let router = NluRouter::new(Arc::new(BrokenProvider));

        assert_eq!(router.intent("send 50 to mom", &[]).await, Intent::Other);
        assert_eq!(router.recipient("send 50 to mom", &[]).await, None);
        assert!(!router.same_amount("the same amount", &[]).await);
        assert_eq!(router.dialog_act("yes", &[]).await, DialogAct::None);
        assert!(!router.answer("hello", "").await.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_router_roundtrip() {
        let router = NluRouter::from_kind(ProviderKind::Keyword);
        assert_eq!(router.kind(), ProviderKind::Keyword);
        assert_eq!(
            router.intent("what's my balance", &[]).await,
            Intent::CheckBalance
        );
        assert_eq!(router.dialog_act("yes please", &[]).await, DialogAct::Confirm);
    }
}
