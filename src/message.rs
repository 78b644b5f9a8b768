// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::language::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn as exchanged with the client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Required; validated non-empty after trim by the handler so that a
    /// missing field and an empty string fail the same way.
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "conversationHistory")]
    pub conversation_history: Vec<Turn>,
    /// Optional language hint; unrecognized values are ignored, not errors.
    #[serde(default)]
    pub language: Option<String>,
}

impl ChatRequest {
    pub fn language_hint(&self) -> Option<Language> {
        self.language.as_deref().and_then(Language::from_hint)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_are_lenient() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert!(req.conversation_history.is_empty());
        assert_eq!(req.language_hint(), None);

        let req: ChatRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.message, "");
    }

    #[test]
    fn unknown_language_hint_is_ignored() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "hola", "language": "es"}"#).unwrap();
        assert_eq!(req.language_hint(), None);

        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "salut", "language": "fr"}"#).unwrap();
        assert_eq!(req.language_hint(), Some(Language::Fr));
    }

    #[test]
    fn history_uses_wire_names() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message": "m", "conversationHistory": [{"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}]}"#,
        )
        .unwrap();
        assert_eq!(req.conversation_history.len(), 2);
        assert_eq!(req.conversation_history[0].role, Role::User);
        assert_eq!(req.conversation_history[1].role, Role::Assistant);
    }
}
