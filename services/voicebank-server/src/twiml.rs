//! Spoken-dialogue markup rendering
//!
//! Thin adapter between a dialogue `Turn` and the XML verbs a telephony
//! network consumes: speak a sentence, gather the next utterance, or hang
//! up. No decision logic lives here.

/// Builder for one webhook response document
#[derive(Debug, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

#[derive(Debug)]
enum Verb {
    Say(String),
    /// Speech gather that posts the next utterance back to `action`
    Gather {
        action: String,
        prompt: String,
    },
    Hangup,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak a sentence
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    /// Speak a prompt and listen for the caller's next utterance
    pub fn gather(mut self, action: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.verbs.push(Verb::Gather {
            action: action.into(),
            prompt: prompt.into(),
        });
        self
    }

    /// End the call
    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// Render the response document
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => {
                    out.push_str(&format!("<Say>{}</Say>", escape(text)));
                }
                Verb::Gather { action, prompt } => {
                    out.push_str(&format!(
                        "<Gather input=\"speech\" action=\"{}\" method=\"POST\" speechTimeout=\"auto\"><Say>{}</Say></Gather>",
                        escape(action),
                        escape(prompt)
                    ));
                }
                Verb::Hangup => out.push_str("<Hangup/>"),
            }
        }
        out.push_str("</Response>");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_then_gather() {
        let xml = VoiceResponse::new()
            .say("Your balance is 100.00 PLN.")
            .gather("/telephony/voice", "You may ask another question.")
            .to_xml();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<Say>Your balance is 100.00 PLN.</Say>"));
        assert!(xml.contains("action=\"/telephony/voice\""));
        assert!(!xml.contains("<Hangup/>"));
    }

    #[test]
    fn test_hangup_rendered_only_when_asked() {
        let xml = VoiceResponse::new().say("Goodbye.").hangup().to_xml();
        assert!(xml.contains("<Say>Goodbye.</Say><Hangup/>"));
    }

    #[test]
    fn test_escaping() {
        let xml = VoiceResponse::new().say("Fish & chips <now>").to_xml();
        assert!(xml.contains("Fish &amp; chips &lt;now&gt;"));
    }
}
