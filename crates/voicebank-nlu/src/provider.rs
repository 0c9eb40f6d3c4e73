//! NLU provider implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use voicebank_types::{TurnEntry, TurnRole};

use crate::types::*;

/// Trait for NLU providers
///
/// Recent dialogue turns are passed as context; providers are free to
/// ignore them. Implementations must not mutate any session state.
#[async_trait]
pub trait NluProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Classify the topic intent of an utterance
    async fn classify_intent(&self, text: &str, history: &[TurnEntry]) -> Result<Intent>;

    /// Extract the spoken recipient phrase, if any ("to my mom" -> "my mom")
    async fn extract_recipient(&self, text: &str, history: &[TurnEntry])
        -> Result<Option<String>>;

    /// Does the utterance refer to repeating the previous transfer amount?
    async fn refers_to_same_amount(&self, text: &str, history: &[TurnEntry]) -> Result<bool>;

    /// Classify the dialog act of an utterance
    async fn classify_dialog_act(&self, text: &str, history: &[TurnEntry]) -> Result<DialogAct>;

    /// Produce a short spoken answer for an out-of-domain question
    async fn answer(&self, text: &str, context: &str) -> Result<String>;
}

/// Render recent turns as classification context
fn render_history(history: &[TurnEntry]) -> String {
    history
        .iter()
        .map(|e| match e.role {
            TurnRole::Caller => format!("Caller: {}", e.text),
            TurnRole::Assistant => format!("Assistant: {}", e.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// OpenAI-compatible Provider
// ============================================================================

/// Configuration for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl OpenAiCompatConfig {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: std::env::var("VOICEBANK_NLU_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            api_key: std::env::var("VOICEBANK_NLU_API_KEY").ok()?,
            model: std::env::var("VOICEBANK_NLU_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
        })
    }
}

/// Provider backed by any OpenAI-compatible chat completions API
pub struct OpenAiCompatProvider {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        Some(Self::new(OpenAiCompatConfig::from_env()?))
    }

    /// One chat completion, returning the raw content string
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NluError::NetworkError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NluError::RequestFailed {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| NluError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default())
    }

    fn user_prompt(text: &str, history: &[TurnEntry]) -> String {
        let context = render_history(history);
        if context.is_empty() {
            text.to_string()
        } else {
            format!("Recent conversation:\n{}\n\nUtterance: {}", context, text)
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

const INTENT_PROMPT: &str = "You are an intent classifier for a phone banking assistant.\n\
Based on the caller's utterance, answer with EXACTLY one word:\n\
- make_transfer  if the caller wants to transfer or pay money to someone\n\
- check_balance  if the caller asks about their balance or how much money they have\n\
- show_history   if the caller asks about recent or past transfers\n\
- other          for anything else\n\n\
Examples:\n\
U: Send 50 to my neighbor\nA: make_transfer\n\
U: How much money do I have?\nA: check_balance\n\
U: Show my last three transfers\nA: show_history\n\
U: Tell me a joke\nA: other\n\
Do not add any explanation or extra text.";

const RECIPIENT_PROMPT: &str = "You extract the transfer recipient from a phone banking utterance.\n\
Answer with ONLY the recipient phrase exactly as spoken, e.g. 'my mom', 'the neighbor', 'rent'.\n\
If no recipient is mentioned, answer with the single word: none\n\
Do not add any explanation or extra text.";

const SAME_AMOUNT_PROMPT: &str = "You decide whether a phone banking utterance refers to reusing \
the amount of a previous transfer (phrases like 'the same amount', 'like last time').\n\
Answer with EXACTLY one word: yes or no.";

const DIALOG_ACT_PROMPT: &str = "You classify a caller's utterance in a phone banking dialogue.\n\
Answer with EXACTLY one word:\n\
- confirm   if the caller agrees or approves\n\
- reject    if the caller declines or cancels\n\
- end_call  if the caller wants to finish the call (goodbye, that's all)\n\
- none      if none of the above is clear\n\
Do not add any explanation or extra text.";

#[async_trait]
impl NluProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "OpenAiCompat"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompat
    }

    async fn classify_intent(&self, text: &str, history: &[TurnEntry]) -> Result<Intent> {
        let content = self
            .complete(INTENT_PROMPT, &Self::user_prompt(text, history), 0.0, 5)
            .await?;
        Ok(Intent::parse(&content))
    }

    async fn extract_recipient(
        &self,
        text: &str,
        history: &[TurnEntry],
    ) -> Result<Option<String>> {
        let content = self
            .complete(RECIPIENT_PROMPT, &Self::user_prompt(text, history), 0.0, 20)
            .await?;
        let phrase = content.trim().trim_matches(|c| c == '"' || c == '\'');
        if phrase.is_empty() || phrase.eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            Ok(Some(phrase.to_string()))
        }
    }

    async fn refers_to_same_amount(&self, text: &str, history: &[TurnEntry]) -> Result<bool> {
        let content = self
            .complete(SAME_AMOUNT_PROMPT, &Self::user_prompt(text, history), 0.0, 3)
            .await?;
        Ok(content.trim().eq_ignore_ascii_case("yes"))
    }

    async fn classify_dialog_act(&self, text: &str, history: &[TurnEntry]) -> Result<DialogAct> {
        let content = self
            .complete(DIALOG_ACT_PROMPT, &Self::user_prompt(text, history), 0.0, 5)
            .await?;
        Ok(DialogAct::parse(&content))
    }

    async fn answer(&self, text: &str, context: &str) -> Result<String> {
        let system = "You are a polite phone banking assistant. \
Answer briefly and clearly in one or two spoken sentences.";
        let user = format!("Caller context:\n{}\n\nCaller question: {}", context, text);
        self.complete(system, &user, 0.3, 120).await
    }
}

// ============================================================================
// Keyword Provider (Deterministic Fallback)
// ============================================================================

/// Deterministic keyword matcher, always available
///
/// The fallback when no model endpoint is configured, and the workhorse of
/// the test suites.
pub struct KeywordProvider;

impl KeywordProvider {
    pub fn new() -> Self {
        Self
    }

    fn contains_any(text: &str, needles: &[&str]) -> bool {
        needles.iter().any(|n| text.contains(n))
    }
}

impl Default for KeywordProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NluProvider for KeywordProvider {
    fn name(&self) -> &'static str {
        "Keyword"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Keyword
    }

    async fn classify_intent(&self, text: &str, _history: &[TurnEntry]) -> Result<Intent> {
        let t = text.to_lowercase();
        // History phrasing ("show my last transfers") also contains transfer
        // words, so it is matched first.
        if Self::contains_any(&t, &["history", "transactions", "last transfers", "recent transfers", "statement"]) {
            Ok(Intent::ShowHistory)
        } else if Self::contains_any(&t, &["transfer", "send", "pay "]) {
            Ok(Intent::MakeTransfer)
        } else if Self::contains_any(&t, &["balance", "how much money", "how much do i have"]) {
            Ok(Intent::CheckBalance)
        } else {
            Ok(Intent::Other)
        }
    }

    async fn extract_recipient(
        &self,
        text: &str,
        _history: &[TurnEntry],
    ) -> Result<Option<String>> {
        let t = text.to_lowercase();
        let Some(idx) = t.find(" to ") else {
            return Ok(None);
        };
        let tail = &t[idx + 4..];
        let phrase: String = tail
            .split_whitespace()
            .filter(|w| !w.chars().any(|c| c.is_ascii_digit()))
            .filter(|w| !matches!(*w, "pln" | "zloty" | "dollars" | "euro" | "euros"))
            .collect::<Vec<_>>()
            .join(" ");
        let phrase = phrase.trim_matches(|c: char| c.is_ascii_punctuation()).trim();
        if phrase.is_empty() {
            Ok(None)
        } else {
            Ok(Some(phrase.to_string()))
        }
    }

    async fn refers_to_same_amount(&self, text: &str, _history: &[TurnEntry]) -> Result<bool> {
        let t = text.to_lowercase();
        Ok(Self::contains_any(
            &t,
            &["same amount", "as last time", "like last time", "same as before"],
        ))
    }

    async fn classify_dialog_act(&self, text: &str, _history: &[TurnEntry]) -> Result<DialogAct> {
        let t = text.to_lowercase();
        let words: Vec<&str> = t
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
            .collect();
        let has_word = |list: &[&str]| words.iter().any(|w| list.contains(w));
        // End-call phrasing wins: "never mind, goodbye" must end the call,
        // not merely reject.
        if has_word(&["goodbye", "bye"])
            || Self::contains_any(&t, &["hang up", "end the call", "that's all", "that is all"])
        {
            Ok(DialogAct::EndCall)
        } else if has_word(&["yes", "yeah", "correct", "confirm", "sure", "right", "ok", "okay"]) {
            Ok(DialogAct::Confirm)
        } else if has_word(&["no", "nope", "cancel", "stop", "don't"])
            || t.contains("never mind")
        {
            Ok(DialogAct::Reject)
        } else {
            Ok(DialogAct::None)
        }
    }

    async fn answer(&self, _text: &str, _context: &str) -> Result<String> {
        Ok("I can help you check your balance, review recent transfers, or send money to a saved recipient.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_intents() {
        let p = KeywordProvider::new();
        assert_eq!(
            p.classify_intent("Send 50 to my mom", &[]).await.unwrap(),
            Intent::MakeTransfer
        );
        assert_eq!(
            p.classify_intent("What is my balance?", &[]).await.unwrap(),
            Intent::CheckBalance
        );
        assert_eq!(
            p.classify_intent("Show my last transfers", &[]).await.unwrap(),
            Intent::ShowHistory
        );
        assert_eq!(
            p.classify_intent("Tell me a joke", &[]).await.unwrap(),
            Intent::Other
        );
    }

    #[tokio::test]
    async fn test_keyword_recipient() {
        let p = KeywordProvider::new();
        assert_eq!(
            p.extract_recipient("send 50 to my mom", &[]).await.unwrap(),
            Some("my mom".to_string())
        );
        assert_eq!(
            p.extract_recipient("transfer 20 pln to the neighbor", &[])
                .await
                .unwrap(),
            Some("the neighbor".to_string())
        );
        assert_eq!(p.extract_recipient("check my balance", &[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keyword_dialog_acts() {
        let p = KeywordProvider::new();
        assert_eq!(
            p.classify_dialog_act("yes, that's right", &[]).await.unwrap(),
            DialogAct::Confirm
        );
        assert_eq!(
            p.classify_dialog_act("no, cancel it", &[]).await.unwrap(),
            DialogAct::Reject
        );
        assert_eq!(
            p.classify_dialog_act("never mind, goodbye", &[]).await.unwrap(),
            DialogAct::EndCall
        );
        assert_eq!(
            p.classify_dialog_act("hmm let me think", &[]).await.unwrap(),
            DialogAct::None
        );
    }

    #[tokio::test]
    async fn test_keyword_same_amount() {
        let p = KeywordProvider::new();
        assert!(p
            .refers_to_same_amount("send mom the same amount", &[])
            .await
            .unwrap());
        assert!(!p.refers_to_same_amount("send mom 50", &[]).await.unwrap());
    }
}
